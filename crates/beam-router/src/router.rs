//! Range Router
//!
//! Splits an inclusive height range into contiguous segments, each answered by
//! exactly one access node.
//!
//! For every cursor position the whole directory is scanned and the LAST
//! covering descriptor wins, so when coverage overlaps, the entry listed later
//! in the directory takes precedence.

use beam_common::{BeamError, NodeDescriptor, QueryRange, Result};

/// A sub-range `[start, end]` and the node responsible for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub node: NodeDescriptor,
    pub start: u64,
    pub end: u64,
}

/// Returns the node responsible for `height`: the last descriptor covering it.
pub fn locate(height: u64, descriptors: &[NodeDescriptor]) -> Result<&NodeDescriptor> {
    descriptors
        .iter()
        .rev()
        .find(|node| node.covers(height))
        .ok_or(BeamError::NoCoverage(height))
}

/// Plans the segments for `range`.
///
/// Segments are in ascending order, start at `range.start()`, end at
/// `range.end()` and leave no gap between them. Fails with `NoCoverage` at the
/// first height no descriptor covers.
pub fn route(range: QueryRange, descriptors: &[NodeDescriptor]) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut cursor = range.start();

    loop {
        let node = locate(cursor, descriptors)?;
        let end = if node.is_unbounded() {
            range.end()
        } else {
            node.end_height.min(range.end())
        };

        segments.push(Segment {
            node: node.clone(),
            start: cursor,
            end,
        });

        // end >= cursor always holds, so this cannot overflow at u64::MAX
        if end >= range.end() {
            return Ok(segments);
        }
        cursor = end + 1;
    }
}
