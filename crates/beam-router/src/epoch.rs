use beam_common::{BeamError, NodeDescriptor, Result};

/// Picks the node serving the newest era: the descriptor with the strictly
/// greatest `start_height`. On ties the entry listed first is kept.
pub fn select_current(descriptors: &[NodeDescriptor]) -> Result<NodeDescriptor> {
    let mut current: Option<&NodeDescriptor> = None;
    for node in descriptors {
        match current {
            Some(best) if node.start_height <= best.start_height => {}
            _ => current = Some(node),
        }
    }
    current.cloned().ok_or(BeamError::NoCoverage(0))
}
