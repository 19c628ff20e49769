//! Shared transcript fixtures for integration tests.
#![allow(dead_code)]

/// Rated game ending in Gote's resignation (Sente wins).
pub const RESIGN_GAME: &str = "# ---- Kifu for Windows ----
開始日時：2025/06/08 13:46:40
終了日時：2025/06/08 14:14:59
棋戦：R対局 早指し2(猶予1分)
手合割：平手
先手：hashiryo1(1598)
後手：hashiryo2(1552)
手数----指手---------消費時間--
1 ２六歩(27)   ( 0:00/00:00:00)
2 ３四歩(33)   ( 0:01/00:00:01)
3 ２五歩(26)   ( 0:12/00:00:12)
4 ３三角(22)   ( 0:02/00:00:03)
5 ７六歩(77)   ( 0:05/00:00:17)
6 ４二銀(31)   ( 0:00/00:00:03)
7 ３三角成(88)   ( 0:03/00:00:20)
8 同　銀(42)   ( 0:01/00:00:04)
9 ８八銀(79)   ( 0:04/00:00:24)
10 投了   ( 0:05/00:10:15)
まで9手で先手の勝ち
";

/// Pawn exchange on the 2nd file followed by a pawn drop; Sente resigns.
pub const DROP_GAME: &str = "先手：sente
後手：gote
手数----指手---------消費時間--
1 ２六歩(27)
2 ８四歩(83)
3 ２五歩(26)
4 ８五歩(84)
5 ２四歩(25)
6 同　歩(23)
*取り返す
7 同　飛(28)
8 ２三歩打
9 投了
まで8手で後手の勝ち
";

/// Game stopped by the clock: no winner is labelled.
pub const TIMEOUT_GAME: &str = "手数----指手---------消費時間--
1 ７六歩(77)
2 ３四歩(33)
3 切れ負け
まで2手で時間切れにより後手の勝ち
";

/// Two-move game with a move line that has no source square.
pub const BROKEN_GAME: &str = "先手：a
後手：b
手数----指手---------消費時間--
1 ７六歩(77)
2 ３四歩
";
