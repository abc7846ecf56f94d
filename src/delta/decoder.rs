// Parses a binary delta byte stream into a fragment list, with the sanity
// checks the wire format requires: each record's start must not exceed its
// end, and the stream must be consumed exactly (no trailing or truncated
// bytes).

use super::fragment::Fragment;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("truncated delta: expected {needed} more bytes at offset {at}")]
    Truncated { at: usize, needed: usize },
    #[error("malformed record at offset {at}: start {start} > end {end}")]
    StartAfterEnd { at: usize, start: u32, end: u32 },
    #[error("trailing garbage after offset {at} ({len} bytes of input)")]
    TrailingBytes { at: usize, len: usize },
}

/// Decode a binary delta. An empty input is valid and decodes to an empty
/// fragment list (identity delta).
pub fn decode(bin: &[u8]) -> Result<Vec<Fragment<'_>>, DecodeError> {
    let mut fragments = Vec::new();
    let mut pos = 0usize;

    while pos < bin.len() {
        if bin.len() - pos < 12 {
            return Err(DecodeError::Truncated {
                at: pos,
                needed: 12 - (bin.len() - pos),
            });
        }

        let start = u32::from_be_bytes(bin[pos..pos + 4].try_into().unwrap());
        let end = u32::from_be_bytes(bin[pos + 4..pos + 8].try_into().unwrap());
        let len = u32::from_be_bytes(bin[pos + 8..pos + 12].try_into().unwrap());

        if start > end {
            return Err(DecodeError::StartAfterEnd { at: pos, start, end });
        }

        let data_start = pos + 12;
        let data_end = data_start
            .checked_add(len as usize)
            .filter(|&e| e <= bin.len())
            .ok_or(DecodeError::Truncated {
                at: data_start,
                needed: len as usize,
            })?;

        fragments.push(Fragment {
            start,
            end,
            data: &bin[data_start..data_end],
        });

        pos = data_end;
    }

    if pos != bin.len() {
        return Err(DecodeError::TrailingBytes {
            at: pos,
            len: bin.len() - pos,
        });
    }

    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_decodes_to_empty_list() {
        assert_eq!(decode(&[]).unwrap(), vec![]);
    }

    #[test]
    fn single_record_round_trips() {
        let mut bin = Vec::new();
        bin.extend_from_slice(&2u32.to_be_bytes());
        bin.extend_from_slice(&4u32.to_be_bytes());
        bin.extend_from_slice(&2u32.to_be_bytes());
        bin.extend_from_slice(b"B\n");

        let frags = decode(&bin).unwrap();
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].start, 2);
        assert_eq!(frags[0].end, 4);
        assert_eq!(frags[0].data, b"B\n");
    }

    #[test]
    fn truncated_header_is_rejected() {
        let bin = [0u8; 8];
        assert_eq!(decode(&bin), Err(DecodeError::Truncated { at: 0, needed: 4 }));
    }

    #[test]
    fn truncated_data_is_rejected() {
        let mut bin = Vec::new();
        bin.extend_from_slice(&0u32.to_be_bytes());
        bin.extend_from_slice(&0u32.to_be_bytes());
        bin.extend_from_slice(&10u32.to_be_bytes());
        bin.extend_from_slice(b"short");
        assert_eq!(
            decode(&bin),
            Err(DecodeError::Truncated { at: 12, needed: 10 })
        );
    }

    #[test]
    fn start_after_end_is_rejected() {
        let mut bin = Vec::new();
        bin.extend_from_slice(&10u32.to_be_bytes());
        bin.extend_from_slice(&4u32.to_be_bytes());
        bin.extend_from_slice(&0u32.to_be_bytes());
        assert_eq!(
            decode(&bin),
            Err(DecodeError::StartAfterEnd { at: 0, start: 10, end: 4 })
        );
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bin = Vec::new();
        bin.extend_from_slice(&0u32.to_be_bytes());
        bin.extend_from_slice(&0u32.to_be_bytes());
        bin.extend_from_slice(&0u32.to_be_bytes());
        bin.push(0xFF);
        assert_eq!(
            decode(&bin),
            Err(DecodeError::TrailingBytes { at: 12, len: 1 })
        );
    }
}
