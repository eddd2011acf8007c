//! Delimiter sniffing.

use std::collections::HashMap;

/// Delimiters tried in order of preference.
pub const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

const DEFAULT_DELIMITER: u8 = b',';

/// Picks the delimiter that splits the first `sample_rows` records most
/// uniformly.
///
/// Each candidate scores `modal_width * consistency`, where consistency is the
/// share of non-blank records with the modal field count. A candidate that
/// never splits a record scores zero. Ties keep the earlier candidate.
pub fn sniff_delimiter(text: &str, sample_rows: usize) -> u8 {
    let mut best = (DEFAULT_DELIMITER, 0.0_f64);
    for delimiter in CANDIDATE_DELIMITERS {
        let score = uniformity_score(text, delimiter, sample_rows);
        if score > best.1 {
            best = (delimiter, score);
        }
    }
    tracing::trace!(delimiter = %char::from(best.0).escape_default(), score = best.1, "delimiter sniffed");
    best.0
}

fn uniformity_score(text: &str, delimiter: u8, sample_rows: usize) -> f64 {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let widths: Vec<usize> = reader
        .records()
        .map_while(std::result::Result::ok)
        .filter(|record| record.iter().any(|cell| !cell.trim().is_empty()))
        .take(sample_rows)
        .map(|record| record.len())
        .collect();
    if widths.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<usize, usize> = HashMap::new();
    for width in &widths {
        *counts.entry(*width).or_default() += 1;
    }
    // Wider width wins equal counts.
    let Some((modal_width, modal_count)) = counts
        .into_iter()
        .max_by_key(|&(width, count)| (count, width))
    else {
        return 0.0;
    };
    if modal_width <= 1 {
        return 0.0;
    }
    modal_width as f64 * (modal_count as f64 / widths.len() as f64)
}
