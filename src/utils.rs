use crate::board::{Board, Cell};

/// Parses an array of string slices into a `Board`.
///
/// Each string slice represents one row, starting from row 0. All rows must
/// have the same length; the board dimensions are inferred from the input.
///
/// Valid characters:
/// - `'0'`..`'9'`: `Cell::Symbol(0)`..`Cell::Symbol(9)`
/// - `'.'`: `Cell::Empty`
///
/// Note that the parser does not enforce the even-pair parity that
/// `Board::populate` guarantees; tests use it to build arbitrary layouts,
/// including deliberately unsolvable ones.
///
/// # Examples
/// ```
/// use linkup_solver::utils::board_from_str_array;
/// use linkup_solver::board::Cell;
///
/// let board = board_from_str_array(&["01", "1."]).unwrap();
/// assert_eq!(board.cell(0, 0), Cell::Symbol(0));
/// assert_eq!(board.cell(1, 1), Cell::Empty);
///
/// assert!(board_from_str_array(&["0X"]).is_err());
/// ```
pub fn board_from_str_array(s: &[&str]) -> Result<Board, String> {
    if s.is_empty() {
        return Err("board must have at least one row".to_string());
    }
    let cols = s[0].chars().count();
    if cols == 0 {
        return Err("board rows must not be empty".to_string());
    }

    let mut cells = Vec::with_capacity(s.len() * cols);
    for (r, row_str) in s.iter().enumerate() {
        if row_str.chars().count() != cols {
            return Err(format!(
                "row {} has {} characters, expected {}",
                r,
                row_str.chars().count(),
                cols
            ));
        }
        for (c, ch) in row_str.chars().enumerate() {
            cells.push(match ch {
                '.' => Cell::Empty,
                '0'..='9' => Cell::Symbol(ch as u8 - b'0'),
                _ => {
                    return Err(format!(
                        "unrecognized character '{}' in row {} col {}",
                        ch, r, c
                    ))
                }
            });
        }
    }
    Ok(Board::from_cells(s.len(), cols, cells))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    #[test]
    fn test_board_from_str_array_valid() {
        let board = board_from_str_array(&["012", "3.4"]).unwrap();
        assert_eq!(board.rows(), 2);
        assert_eq!(board.cols(), 3);
        assert_eq!(board.cell(0, 0), Cell::Symbol(0));
        assert_eq!(board.cell(0, 2), Cell::Symbol(2));
        assert_eq!(board.cell(1, 1), Cell::Empty);
        assert_eq!(board.cell(1, 2), Cell::Symbol(4));
    }

    #[test]
    fn test_board_from_str_array_invalid_char() {
        let result = board_from_str_array(&["0X"]);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("unrecognized character 'X'"));
    }

    #[test]
    fn test_board_from_str_array_ragged_rows() {
        let result = board_from_str_array(&["012", "01"]);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("row 1 has 2 characters"));
    }

    #[test]
    fn test_board_from_str_array_empty_input() {
        assert!(board_from_str_array(&[]).is_err());
        assert!(board_from_str_array(&[""]).is_err());
    }

    #[test]
    fn test_board_from_str_array_single_row() {
        let board = board_from_str_array(&["0...0"]).unwrap();
        assert_eq!(board.rows(), 1);
        assert_eq!(board.cols(), 5);
        assert_eq!(board.occupied_cells(), vec![(0, 0), (0, 4)]);
    }
}
