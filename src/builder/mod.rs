/*!
Readers for the supported input formats.

- [dimacs]: plain CNF; every clause becomes its own group, labelled by its 1-based input position.
- [gcnf]: group-oriented CNF; every clause line carries a `{g}` label, 0 for the background.
- [vgcnf]: a variable-group assignment over an otherwise plain CNF; `{g}` lines list the variables of group `g`.
*/

pub mod dimacs;
pub mod gcnf;
pub mod vgcnf;

use crate::{
    structures::Lit,
    types::err::ParseError,
};

/// Parses one signed literal token, rejecting zero and out-of-range values.
pub(crate) fn parse_lit(token: &str, line: usize) -> Result<Option<Lit>, ParseError> {
    match token.parse::<i64>() {
        Err(_) => Err(ParseError::Literal(line)),
        Ok(0) => Ok(None),
        Ok(int) => {
            let int = i32::try_from(int).map_err(|_| ParseError::Literal(line))?;
            Ok(Some(Lit::from_int(int)))
        }
    }
}
