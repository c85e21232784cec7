/*!
The group-oriented CNF reader.

Each clause line begins with `{g}`, the group label, 0 denoting the background; the literal list follows, terminated by `0`.
The `p gcnf <vars> <clauses> <groups>` header is validated but its counts serve as capacity hints only.
*/

use std::io::BufRead;

use crate::{
    db::group_set::GroupSet,
    misc::log::targets,
    structures::{Gid, Lit},
    types::err::{ErrorKind, ParseError},
};

/// Reads a GCNF formula.
pub fn read_gcnf(mut reader: impl BufRead) -> Result<GroupSet, ErrorKind> {
    let mut gset = GroupSet::new();
    let mut buffer = String::with_capacity(1024);
    let mut clause_buffer: Vec<Lit> = Vec::new();
    let mut current_gid: Option<Gid> = None;
    let mut line_counter = 0;

    'formula_loop: loop {
        buffer.clear();
        match reader.read_line(&mut buffer) {
            Ok(0) => break 'formula_loop,
            Ok(_) => line_counter += 1,
            Err(_) => return Err(ParseError::Line(line_counter).into()),
        }

        match buffer.chars().next() {
            Some('c') => continue,
            Some('%') => break 'formula_loop,
            Some('p') => {
                let mut details = buffer.split_whitespace();
                match details.nth(1) {
                    Some("gcnf") => {}
                    _ => return Err(ParseError::ProblemSpecification.into()),
                }
                continue;
            }
            _ => {}
        }

        for token in buffer.split_whitespace() {
            if let Some(label) = token.strip_prefix('{') {
                if current_gid.is_some() {
                    // A label inside a clause: the previous clause never ended.
                    return Err(ParseError::UnterminatedClause.into());
                }
                let label = label
                    .strip_suffix('}')
                    .ok_or(ParseError::GroupLabel(line_counter))?;
                let gid: Gid = label.parse().map_err(|_| ParseError::GroupLabel(line_counter))?;
                current_gid = Some(gid);
                continue;
            }

            let gid = current_gid.ok_or(ParseError::GroupLabel(line_counter))?;
            match crate::builder::parse_lit(token, line_counter)? {
                Some(lit) => clause_buffer.push(lit),
                None => {
                    gset.add_clause(gid, std::mem::take(&mut clause_buffer));
                    current_gid = None;
                }
            }
        }
    }

    if current_gid.is_some() || !clause_buffer.is_empty() {
        return Err(ParseError::UnterminatedClause.into());
    }
    gset.seal();
    log::debug!(target: targets::PARSER, "Read {} clauses in {} groups", gset.size(), gset.gsize());
    Ok(gset)
}

#[cfg(test)]
mod gcnf_tests {
    use super::*;

    #[test]
    fn labels_assign_groups() {
        let input = b"p gcnf 3 4 2\n{0} 1 0\n{1} -1 2 0\n{1} -2 0\n{2} 3 0\n";
        let gset = read_gcnf(&input[..]).unwrap();
        assert_eq!(gset.gsize(), 3);
        assert_eq!(gset.gclauses(1).len(), 2);
        assert!(gset.has_g0());
        assert_eq!(gset.max_gid(), 2);
    }

    #[test]
    fn missing_label_is_an_error() {
        let input = b"p gcnf 1 1 1\n1 0\n";
        assert!(read_gcnf(&input[..]).is_err());
    }

    #[test]
    fn empty_clause_in_a_group() {
        let input = b"p gcnf 1 2 1\n{0} 1 0\n{1} 0\n";
        let gset = read_gcnf(&input[..]).unwrap();
        let cid = gset.gclauses(1)[0];
        assert_eq!(gset.clause(cid).asize(), 0);
    }
}
