/// Errors that can occur when building a board snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board of size {size} needs {expected} squares, got {actual}")]
    WrongLength {
        size: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{0} squares do not form a square board")]
    NotSquare(usize),

    #[error("unknown square symbol {0:?}")]
    UnknownSymbol(char),
}

/// Errors that can occur when parsing a mark, difficulty or variant tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseTagError {
    #[error("unknown mark {0:?} (expected X or O)")]
    Mark(String),

    #[error("unknown difficulty {0:?}")]
    Difficulty(String),

    #[error("unknown variant {0:?}")]
    Variant(String),
}

/// Errors reported by [`MoveRequest::validate`](crate::engine::MoveRequest::validate).
///
/// The decision path itself never fails; validation is for callers that
/// want to reject malformed input up front.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("win length {win_length} exceeds board size {size}")]
    WinLengthTooLong { size: usize, win_length: usize },

    #[error("board has size {actual} but the request is for size {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("history references square {index} outside a board of {cells} squares")]
    HistoryOutOfRange { index: usize, cells: usize },

    #[error(transparent)]
    Board(#[from] BoardError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_display() {
        let err = BoardError::WrongLength {
            size: 3,
            expected: 9,
            actual: 8,
        };
        assert_eq!(err.to_string(), "board of size 3 needs 9 squares, got 8");
    }

    #[test]
    fn test_tag_error_display() {
        let err = ParseTagError::Difficulty("nightmare".to_string());
        assert_eq!(err.to_string(), "unknown difficulty \"nightmare\"");
    }

    #[test]
    fn test_request_error_from_board_error() {
        let err: RequestError = BoardError::NotSquare(8).into();
        assert_eq!(err.to_string(), "8 squares do not form a square board");
    }
}
