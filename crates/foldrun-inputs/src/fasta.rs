//! Minimal FASTA handling for single-record UniProt responses.

/// Concatenate every sequence line after the first header.
///
/// Blank lines and surrounding whitespace are ignored. Stops at a second
/// header so a multi-record response yields only its first record.
pub fn first_record_sequence(fasta: &str) -> String {
    let mut lines = fasta.trim().lines();
    let mut sequence = String::new();
    match lines.next() {
        Some(first) if first.starts_with('>') => {}
        Some(first) => sequence.push_str(first.trim()),
        None => return sequence,
    }
    for line in lines {
        if line.starts_with('>') {
            break;
        }
        sequence.push_str(line.trim());
    }
    sequence
}
