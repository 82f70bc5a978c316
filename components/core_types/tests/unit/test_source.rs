//! Unit tests for SourcePosition

use core_types::SourcePosition;

#[cfg(test)]
mod source_position_tests {
    use super::*;

    #[test]
    fn test_source_position_creation() {
        let pos = SourcePosition {
            line: 10,
            column: 5,
            offset: 150,
        };

        assert_eq!(pos.line, 10);
        assert_eq!(pos.column, 5);
        assert_eq!(pos.offset, 150);
    }

    #[test]
    fn test_source_position_large_values() {
        let pos = SourcePosition::new(u32::MAX, u32::MAX, usize::MAX);

        assert_eq!(pos.line, u32::MAX);
        assert_eq!(pos.column, u32::MAX);
        assert_eq!(pos.offset, usize::MAX);
    }

    #[test]
    fn test_source_position_is_copy() {
        let pos = SourcePosition::new(2, 3, 9);
        let copy = pos;
        assert_eq!(pos, copy);
    }

    #[test]
    fn test_source_position_display() {
        assert_eq!(SourcePosition::new(7, 12, 80).to_string(), "7:12");
    }

    #[test]
    fn test_source_position_serializes_all_fields() {
        let json = serde_json::to_value(SourcePosition::new(4, 2, 31)).unwrap();
        assert_eq!(json["line"], 4);
        assert_eq!(json["column"], 2);
        assert_eq!(json["offset"], 31);
    }
}
