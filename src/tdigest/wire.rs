// src/tdigest/wire.rs
//
// Canonical binary wire codec ("TDG1" format).
//
// Digest layout (little-endian):
//
//   header (40 bytes):
//     0..4   : tag = b"TDG1" (magic + version in one u32; bumped on any
//              layout change, older tags are rejected)
//     4..12  : compression      (f64)
//    12..20  : min              (f64)
//    20..28  : max              (f64)
//    28..36  : processed weight (f64)
//    36..40  : centroid count   (u32)
//
//   payload:
//     count × ( mean f64, weight f64 )
//
// A merge is forced before encoding, so the payload is always the canonical
// sorted centroid array. NaN/±inf bit patterns in the float fields travel
// verbatim. A standalone centroid-list codec shares the record shape:
// count (u32) then records.
//
// Decoding a digest preserves the target's scale, compression and decay
// configuration; the wire compression field only feeds the element-count
// sanity ceiling.

use crate::error::{TdError, TdResult};
use crate::tdigest::centroids::{Centroid, CentroidList};
use crate::tdigest::TDigest;

const TAG: u32 = u32::from_le_bytes(*b"TDG1");
const HEADER_LEN: usize = 40;
const RECORD_LEN: usize = 8 + 8;

/* ============================
 * Small helpers
 * ============================ */

#[inline]
fn write_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

#[inline]
fn write_f64(buf: &mut Vec<u8>, v: f64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

#[inline]
fn read_u32(bytes: &[u8], offset: &mut usize) -> TdResult<u32> {
    if *offset + 4 > bytes.len() {
        return Err(TdError::CorruptData {
            context: "truncated u32",
        });
    }
    let mut arr = [0u8; 4];
    arr.copy_from_slice(&bytes[*offset..*offset + 4]);
    *offset += 4;
    Ok(u32::from_le_bytes(arr))
}

#[inline]
fn read_f64(bytes: &[u8], offset: &mut usize) -> TdResult<f64> {
    if *offset + 8 > bytes.len() {
        return Err(TdError::CorruptData {
            context: "truncated f64",
        });
    }
    let mut arr = [0u8; 8];
    arr.copy_from_slice(&bytes[*offset..*offset + 8]);
    *offset += 8;
    Ok(f64::from_le_bytes(arr))
}

fn write_records(buf: &mut Vec<u8>, list: &CentroidList) {
    for c in list {
        write_f64(buf, c.mean());
        write_f64(buf, c.weight());
    }
}

fn read_records(bytes: &[u8], offset: &mut usize, count: usize) -> TdResult<Vec<Centroid>> {
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let mean = read_f64(bytes, offset)?;
        let weight = read_f64(bytes, offset)?;
        if weight < 0.0 {
            return Err(TdError::CorruptData {
                context: "negative centroid weight",
            });
        }
        out.push(Centroid::new(mean, weight));
    }
    Ok(out)
}

/* ============================
 * Digest codec
 * ============================ */

impl TDigest {
    /// Encode the digest; forces a merge so the payload is canonical.
    pub fn marshal_binary(&mut self) -> Vec<u8> {
        self.process();
        let n = self.processed.len();
        let mut buf = Vec::with_capacity(HEADER_LEN + RECORD_LEN * n);
        write_u32(&mut buf, TAG);
        write_f64(&mut buf, self.compression);
        write_f64(&mut buf, self.min());
        write_f64(&mut buf, self.max());
        write_f64(&mut buf, self.processed_weight);
        write_u32(&mut buf, n as u32);
        write_records(&mut buf, &self.processed);
        buf
    }

    /// Decode a digest buffer into this digest, replacing its observations.
    /// The digest's own scale, compression and decay configuration are kept.
    pub fn unmarshal_binary(&mut self, bytes: &[u8]) -> TdResult<()> {
        let mut offset = 0;
        let tag = read_u32(bytes, &mut offset)?;
        if tag != TAG {
            return Err(TdError::CorruptData {
                context: "magic/version tag",
            });
        }
        let wire_compression = read_f64(bytes, &mut offset)?;
        if !wire_compression.is_finite() || wire_compression <= 0.0 {
            return Err(TdError::CorruptData {
                context: "compression field",
            });
        }
        let min = read_f64(bytes, &mut offset)?;
        let max = read_f64(bytes, &mut offset)?;
        let weight = read_f64(bytes, &mut offset)?;
        let count = read_u32(bytes, &mut offset)? as usize;

        if count as f64 > 10.0 * wire_compression {
            return Err(TdError::CorruptData {
                context: "implausible centroid count",
            });
        }
        match bytes.len().cmp(&(HEADER_LEN + RECORD_LEN * count)) {
            std::cmp::Ordering::Less => {
                return Err(TdError::CorruptData {
                    context: "buffer shorter than declared count",
                })
            }
            std::cmp::Ordering::Greater => {
                return Err(TdError::CorruptData {
                    context: "trailing bytes",
                })
            }
            std::cmp::Ordering::Equal => {}
        }
        let records = read_records(bytes, &mut offset, count)?;

        self.processed = CentroidList::from_unsorted(records);
        self.unprocessed.clear();
        self.processed_weight = weight;
        self.unprocessed_weight = 0.0;
        self.min = min.into();
        self.max = max.into();
        self.update_cumulative();
        Ok(())
    }
}

/* ============================
 * Centroid-list codec
 * ============================ */

impl CentroidList {
    /// Encode as count (u32) + records, little-endian.
    pub fn marshal_binary(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(4 + RECORD_LEN * self.len());
        write_u32(&mut buf, self.len() as u32);
        write_records(&mut buf, self);
        buf
    }
}

/// Decode a standalone centroid-list buffer.
pub fn unmarshal_centroid_list(bytes: &[u8]) -> TdResult<CentroidList> {
    let mut offset = 0;
    let count = read_u32(bytes, &mut offset)? as usize;
    match bytes.len().cmp(&(4 + RECORD_LEN * count)) {
        std::cmp::Ordering::Less => {
            return Err(TdError::CorruptData {
                context: "buffer shorter than declared count",
            })
        }
        std::cmp::Ordering::Greater => {
            return Err(TdError::CorruptData {
                context: "trailing bytes",
            })
        }
        std::cmp::Ordering::Equal => {}
    }
    let records = read_records(bytes, &mut offset, count)?;
    Ok(CentroidList::from_unsorted(records))
}

/// Decode a centroid-list buffer and feed it through `td`'s ingest path.
/// The declared count is held to a sanity ceiling of 10·compression;
/// zero-weight records are dropped.
pub fn unmarshal_centroid_list_into(bytes: &[u8], td: &mut TDigest) -> TdResult<()> {
    let mut offset = 0;
    let count = read_u32(bytes, &mut offset)? as usize;
    if count as f64 > 10.0 * td.compression() {
        return Err(TdError::CorruptData {
            context: "implausible centroid count",
        });
    }
    if bytes.len() < 4 + RECORD_LEN * count {
        return Err(TdError::CorruptData {
            context: "buffer shorter than declared count",
        });
    }
    let records = read_records(bytes, &mut offset, count)?;
    for c in records {
        if c.weight() > 0.0 {
            td.add_centroid(c)?;
        }
    }
    Ok(())
}

/* ------------------------------ TESTS ------------------------------ */
