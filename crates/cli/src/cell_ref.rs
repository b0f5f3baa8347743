// Cell references on the command line.
//
// A reference addresses a slot of the dense grid inside one section, either
// as zero-based "row:col" or spreadsheet-style "B3" (one-based row).

/// Parse "2:1" or "B3" into a zero-based (row, v_col).
pub fn parse_cell_ref(s: &str) -> Option<(usize, usize)> {
    let s = s.trim();
    if let Some((row, col)) = s.split_once(':') {
        return Some((row.trim().parse().ok()?, col.trim().parse().ok()?));
    }
    parse_a1(s)
}

/// Parse a comma-separated list of references.
pub fn parse_cell_list(s: &str) -> Result<Vec<(usize, usize)>, String> {
    s.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| parse_cell_ref(part).ok_or_else(|| format!("invalid cell reference: {}", part.trim())))
        .collect()
}

fn parse_a1(s: &str) -> Option<(usize, usize)> {
    let s = s.to_uppercase();
    let mut col_str = String::new();
    let mut row_str = String::new();

    for c in s.chars() {
        if c.is_ascii_alphabetic() && row_str.is_empty() {
            col_str.push(c);
        } else if c.is_ascii_digit() {
            row_str.push(c);
        } else {
            return None;
        }
    }

    if col_str.is_empty() || row_str.is_empty() {
        return None;
    }

    // A=0, B=1, ..., Z=25, AA=26; None once the letters overflow usize
    let col = col_str
        .bytes()
        .try_fold(0usize, |col, c| col.checked_mul(26)?.checked_add(usize::from(c - b'A') + 1))?
        - 1;

    let row: usize = row_str.parse().ok()?;
    if row == 0 {
        return None;
    }

    Some((row - 1, col))
}

/// Format a zero-based (row, v_col) the way it is accepted back.
pub fn format_cell_ref(row: usize, col: usize) -> String {
    format!("{}:{}", row, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_refs() {
        assert_eq!(parse_cell_ref("0:0"), Some((0, 0)));
        assert_eq!(parse_cell_ref("12:3"), Some((12, 3)));
        assert_eq!(parse_cell_ref(" 1 : 2 "), Some((1, 2)));
        assert_eq!(parse_cell_ref("1:"), None);
        assert_eq!(parse_cell_ref("-1:0"), None);
    }

    #[test]
    fn test_a1_refs() {
        assert_eq!(parse_cell_ref("A1"), Some((0, 0)));
        assert_eq!(parse_cell_ref("b2"), Some((1, 1)));
        assert_eq!(parse_cell_ref("AA1"), Some((0, 26)));
        assert_eq!(parse_cell_ref("A0"), None);
        assert_eq!(parse_cell_ref("1A"), None);
    }

    #[test]
    fn test_a1_long_column_is_rejected() {
        assert_eq!(parse_cell_ref("AAAAAAAAAAAAAAAA1"), None);
        assert_eq!(parse_cell_ref(&format!("{}1", "Z".repeat(40))), None);
        assert!(parse_cell_ref("AAAAAAAAAAAA1").is_some());
    }

    #[test]
    fn test_cell_list() {
        assert_eq!(parse_cell_list("0:0,0:1, B1"), Ok(vec![(0, 0), (0, 1), (0, 1)]));
        assert!(parse_cell_list("0:0,x").is_err());
        assert_eq!(format_cell_ref(3, 1), "3:1");
    }
}
