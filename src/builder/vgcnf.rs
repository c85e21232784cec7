/*!
The variable-group CNF reader.

The formula itself is plain CNF --- every clause its own group, as in [dimacs](crate::builder::dimacs) --- and `{g}` lines assign variables to variable group `g`: `{g} v1 v2 … 0`.
Variables without an assignment belong to the background variable group 0.
*/

use std::io::BufRead;

use crate::{
    db::group_set::GroupSet,
    misc::log::targets,
    structures::{Gid, Lit, Var},
    types::err::{ErrorKind, ParseError},
};

/// Reads a VGCNF instance: clauses plus a variable-group assignment.
pub fn read_vgcnf(mut reader: impl BufRead) -> Result<GroupSet, ErrorKind> {
    let mut gset = GroupSet::new();
    let mut buffer = String::with_capacity(1024);
    let mut clause_buffer: Vec<Lit> = Vec::new();
    let mut line_counter = 0;
    let mut clause_counter: Gid = 0;

    'input_loop: loop {
        buffer.clear();
        match reader.read_line(&mut buffer) {
            Ok(0) => break 'input_loop,
            Ok(_) => line_counter += 1,
            Err(_) => return Err(ParseError::Line(line_counter).into()),
        }

        match buffer.chars().next() {
            Some('c') => continue,
            Some('%') => break 'input_loop,
            Some('p') => {
                let mut details = buffer.split_whitespace();
                match details.nth(1) {
                    Some("vgcnf") => {}
                    _ => return Err(ParseError::ProblemSpecification.into()),
                }
                continue;
            }
            Some('{') => {
                // A variable-group line: {g} v1 v2 ... 0
                let mut tokens = buffer.split_whitespace();
                let label = tokens.next().unwrap_or_default();
                let label = label
                    .strip_prefix('{')
                    .and_then(|l| l.strip_suffix('}'))
                    .ok_or(ParseError::GroupLabel(line_counter))?;
                let vgid: Gid = label.parse().map_err(|_| ParseError::GroupLabel(line_counter))?;
                for token in tokens {
                    let var: Var = token.parse().map_err(|_| ParseError::Literal(line_counter))?;
                    if var == 0 {
                        continue 'input_loop;
                    }
                    gset.assign_var_group(var, vgid);
                }
                return Err(ParseError::UnterminatedClause.into());
            }
            _ => {}
        }

        for token in buffer.split_whitespace() {
            match crate::builder::parse_lit(token, line_counter)? {
                Some(lit) => clause_buffer.push(lit),
                None => {
                    clause_counter += 1;
                    gset.add_clause(clause_counter, std::mem::take(&mut clause_buffer));
                }
            }
        }
    }

    if !clause_buffer.is_empty() {
        return Err(ParseError::UnterminatedClause.into());
    }
    gset.seal();
    log::debug!(target: targets::PARSER, "Read {} clauses, {} variable groups", gset.size(), gset.vgsize());
    Ok(gset)
}

#[cfg(test)]
mod vgcnf_tests {
    use super::*;

    #[test]
    fn variable_groups_are_assigned() {
        let input = b"p vgcnf 3 3 2\n{1} 1 0\n{2} 2 3 0\n1 0\n-1 2 0\n-2 0\n";
        let gset = read_vgcnf(&input[..]).unwrap();
        assert!(gset.var_mode());
        assert_eq!(gset.var_group(1), 1);
        assert_eq!(gset.var_group(2), 2);
        assert_eq!(gset.var_group(3), 2);
        assert_eq!(gset.size(), 3);
        assert_eq!(gset.vgsize(), 2);
    }

    #[test]
    fn unterminated_group_line_is_an_error() {
        let input = b"p vgcnf 1 1 1\n{1} 1\n";
        assert!(read_vgcnf(&input[..]).is_err());
    }
}
