/// Loaders for word2vec-format embedding files.
///
/// Handles the C word2vec text and binary layouts: an ASCII header line
/// `"<count> <dims>"` followed by one entry per token. fastText `.vec`
/// exports use the same text layout; Poincaré embeddings are commonly
/// stored in word2vec format as well and only differ in the metric the
/// resulting store answers distance queries under.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{info, warn};

use super::local::{KeyedVectors, Metric};
use super::{LoadError, WordVectors};

/// Load a pre-trained Word2Vec model.
///
/// `binary` selects between the binary and text variants of the format.
pub fn load_word2vec_model(path: &Path, binary: bool) -> Result<KeyedVectors, LoadError> {
    read_model(path, binary, Metric::Cosine)
}

/// Load a pre-trained fastText model from a `.vec` text export.
///
/// Native fastText `.bin` files (subword n-gram models) are not supported;
/// export the vectors to `.vec` first.
pub fn load_fasttext_model(path: &Path) -> Result<KeyedVectors, LoadError> {
    read_model(path, false, Metric::Cosine)
}

/// Load a Poincaré embedding model stored in word2vec format.
///
/// The resulting store answers distance queries with the Poincaré-ball
/// metric instead of cosine.
pub fn load_poincare_model(path: &Path, binary: bool) -> Result<KeyedVectors, LoadError> {
    read_model(path, binary, Metric::Poincare)
}

fn read_model(path: &Path, binary: bool, metric: Metric) -> Result<KeyedVectors, LoadError> {
    let kv = if binary {
        let data = std::fs::read(path)?;
        read_binary(&data, metric)?
    } else {
        let file = File::open(path)?;
        read_text(BufReader::new(file), metric)?
    };
    info!(
        "Loaded {} vectors ({}d, {:?}) from {}",
        kv.len(),
        kv.dimensions(),
        kv.metric(),
        path.display()
    );
    Ok(kv)
}

/// Parse the `"<count> <dims>"` header line.
fn parse_header(line: &str) -> Result<(usize, usize), LoadError> {
    let mut parts = line.split_whitespace();
    let (Some(count), Some(dims), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(LoadError::Parse {
            entry: 0,
            message: format!("malformed header line {line:?}, expected \"<count> <dims>\""),
        });
    };
    let count = count.parse::<usize>().map_err(|e| LoadError::Parse {
        entry: 0,
        message: format!("invalid entry count {count:?}: {e}"),
    })?;
    let dims = dims.parse::<usize>().map_err(|e| LoadError::Parse {
        entry: 0,
        message: format!("invalid dimension {dims:?}: {e}"),
    })?;
    Ok((count, dims))
}

fn read_text<R: BufRead>(reader: R, metric: Metric) -> Result<KeyedVectors, LoadError> {
    let mut lines = reader.lines();
    let header = lines.next().ok_or_else(|| LoadError::Parse {
        entry: 0,
        message: "empty file, missing header line".to_string(),
    })??;
    let (count, dims) = parse_header(&header)?;

    let mut kv = KeyedVectors::new(dims, metric);
    let mut parsed = 0usize;

    for (entry, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if parsed == count {
            return Err(LoadError::Parse {
                entry,
                message: format!("more entries than the {count} declared in the header"),
            });
        }

        let mut fields = line.split_whitespace();
        let token = fields.next().ok_or_else(|| LoadError::Parse {
            entry,
            message: "missing token".to_string(),
        })?;
        let values = fields
            .map(|v| {
                v.parse::<f32>().map_err(|e| LoadError::Parse {
                    entry,
                    message: format!("invalid float {v:?} for token {token:?}: {e}"),
                })
            })
            .collect::<Result<Vec<f32>, LoadError>>()?;
        if values.len() != dims {
            return Err(LoadError::Parse {
                entry,
                message: format!(
                    "token {token:?} has {} values, expected {dims}",
                    values.len()
                ),
            });
        }

        if !kv.push(token, values)? {
            warn!("duplicate token {token:?} at entry {entry}, keeping first occurrence");
        }
        parsed += 1;
    }

    if parsed != count {
        return Err(LoadError::Parse {
            entry: parsed,
            message: format!("header declares {count} entries, found {parsed}"),
        });
    }
    Ok(kv)
}

fn read_binary(data: &[u8], metric: Metric) -> Result<KeyedVectors, LoadError> {
    let header_end = data
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| LoadError::Parse {
            entry: 0,
            message: "missing header line".to_string(),
        })?;
    let header = std::str::from_utf8(&data[..header_end]).map_err(|_| LoadError::Parse {
        entry: 0,
        message: "header line is not valid UTF-8".to_string(),
    })?;
    let (count, dims) = parse_header(header)?;

    let mut kv = KeyedVectors::new(dims, metric);
    let mut pos = header_end + 1;

    for entry in 0..count {
        // Some writers emit a newline between entries
        while pos < data.len() && data[pos] == b'\n' {
            pos += 1;
        }

        let start = pos;
        while pos < data.len() && data[pos] != b' ' {
            pos += 1;
        }
        if pos >= data.len() {
            return Err(LoadError::Parse {
                entry,
                message: "unexpected end of file while reading token".to_string(),
            });
        }
        let token = std::str::from_utf8(&data[start..pos]).map_err(|_| LoadError::Parse {
            entry,
            message: "token is not valid UTF-8".to_string(),
        })?;
        pos += 1;

        let needed = dims * 4;
        if data.len() - pos < needed {
            return Err(LoadError::Parse {
                entry,
                message: format!("truncated vector for token {token:?}"),
            });
        }
        let mut values = Vec::with_capacity(dims);
        for chunk in data[pos..pos + needed].chunks_exact(4) {
            values.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
        }
        pos += needed;

        if !kv.push(token, values)? {
            warn!("duplicate token {token:?} at entry {entry}, keeping first occurrence");
        }
    }

    if data[pos..].iter().any(|&b| b != b'\n' && b != b' ') {
        return Err(LoadError::Parse {
            entry: count,
            message: "trailing data after final entry".to_string(),
        });
    }
    Ok(kv)
}
