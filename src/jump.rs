use crate::token::{Token, TokenKind};

/// Pair WHILE/END token positions ahead of execution.
///
/// `table[i]` holds the partner index when the token at `i` is one half of a
/// matched pair; every other slot is `None`. An END with no open WHILE on
/// the stack is dropped here, and a WHILE left open at the end of the scan
/// keeps its `None` slot. The machine treats a missing entry as a
/// fall-through, so neither case is an error.
pub fn build_jump_table(tokens: &[Token]) -> Vec<Option<usize>> {
    let mut table: Vec<Option<usize>> = vec![None; tokens.len()];
    let mut stack: Vec<usize> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LoopOpen => stack.push(i),
            TokenKind::LoopClose => {
                if let Some(open_index) = stack.pop() {
                    table[open_index] = Some(i);
                    table[i] = Some(open_index);
                }
            }
            _ => {}
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn pairs_point_at_each_other() {
        // WHILE . END . EXIT
        let tokens = tokenize("WHILE;END");
        let table = build_jump_table(&tokens);
        assert_eq!(table[0], Some(2));
        assert_eq!(table[2], Some(0));
        assert_eq!(table[1], None);
    }

    #[test]
    fn nested_pairs_resolve_inside_out() {
        // Indexes: 0 WHILE, 1 sep, 2 WHILE, 3 sep, 4 END, 5 sep, 6 END, 7 EXIT
        let tokens = tokenize("WHILE;WHILE;END;END");
        let table = build_jump_table(&tokens);
        assert_eq!(table[2], Some(4));
        assert_eq!(table[4], Some(2));
        assert_eq!(table[0], Some(6));
        assert_eq!(table[6], Some(0));
    }

    #[test]
    fn unmatched_end_is_dropped() {
        let tokens = tokenize("END");
        let table = build_jump_table(&tokens);
        assert!(table.iter().all(|slot| slot.is_none()));
    }

    #[test]
    fn unmatched_while_stays_dangling() {
        let tokens = tokenize("WHILE;ADD");
        let table = build_jump_table(&tokens);
        assert!(table.iter().all(|slot| slot.is_none()));
    }

    #[test]
    fn end_before_while_pairs_nothing() {
        let tokens = tokenize("END;WHILE");
        let table = build_jump_table(&tokens);
        assert!(table.iter().all(|slot| slot.is_none()));
    }
}
