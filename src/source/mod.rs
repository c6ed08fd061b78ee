pub mod comment;
pub mod file;
pub mod trim;

// 1. The source is decoded from UTF-8 into unicode characters. A multibyte
// sequence is never split, and bytes that are not valid UTF-8 are an error.

// 2. Every `//` that appears in code, that is outside block comments, string
// literals and character literals, starts a line comment. The comment is removed
// up to but not including the next new-line character. Block comments end at the
// first `*/` and do not nest. Inside a literal a backslash escapes the following
// character, which can therefore never close the literal.

// 3. Whitespace left at the end of each line is removed, and a new-line is
// appended if the last line does not already end in one.
