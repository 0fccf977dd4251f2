//! Line-level `nom` primitives shared by both declaration formats.
//!
//! Every declaration file is line oriented: a `#` starts a comment that runs
//! to the end of the line, and what remains is trimmed before being handed
//! to the record parser.

use cascade_common::constants::{CLUSTER_ASSIGN, COMMENT_MARKER};
use nom::{
    IResult, Parser,
    bytes::complete::{take_till, take_while, take_while1},
    character::complete::char,
    combinator::{all_consuming, rest},
    multi::separated_list0,
    sequence::preceded,
};

/// Member separators inside a cluster declaration.
fn is_member_separator(c: char) -> bool {
    c == ',' || c.is_whitespace()
}

fn before_comment(input: &str) -> IResult<&str, &str> {
    take_till(|c: char| c == COMMENT_MARKER).parse(input)
}

/// Returns the content of a line with its comment removed and surrounding
/// whitespace trimmed.
///
/// Everything after the first `#` is dropped, even inside quotes.
#[must_use]
pub fn strip_comment(line: &str) -> &str {
    before_comment(line).map_or(line, |(_, content)| content).trim()
}

/// Parses exactly one whitespace-free word spanning the whole input.
pub fn single_word(input: &str) -> IResult<&str, &str> {
    all_consuming(take_while1(|c: char| !c.is_whitespace())).parse(input)
}

/// Splits `lhs = rhs` at the first `=`.
pub fn assignment(input: &str) -> IResult<&str, (&str, &str)> {
    (
        take_till(|c: char| c == CLUSTER_ASSIGN),
        preceded(char(CLUSTER_ASSIGN), rest),
    )
        .parse(input)
}

fn separators(input: &str) -> IResult<&str, &str> {
    take_while(is_member_separator).parse(input)
}

fn separator_run(input: &str) -> IResult<&str, &str> {
    take_while1(is_member_separator).parse(input)
}

fn member(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !is_member_separator(c)).parse(input)
}

/// Parses a member list separated by any run of commas and whitespace.
///
/// Leading and trailing separators are tolerated; empty members never
/// appear in the output.
pub fn member_list(input: &str) -> IResult<&str, Vec<&str>> {
    preceded(separators, separated_list0(separator_run, member)).parse(input)
}
