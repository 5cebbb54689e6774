// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout probe: decide from rendered geometry whether a region is showing.
//!
//! The probe is the ground truth for collapsed-ness. It never consults class
//! names or ARIA state, only what the host reports about layout and computed
//! visibility at the moment of the call.

use crate::host::{Host, LayoutBox, Visibility};

/// Returns `true` if the box occupies rendered space.
///
/// Any of a non-zero offset width, a non-zero offset height, or at least one
/// client rectangle counts as layout.
pub fn box_has_layout(layout: &LayoutBox) -> bool {
    layout.offset_size.width != 0.0
        || layout.offset_size.height != 0.0
        || !layout.client_rects.is_empty()
}

/// Returns `true` if `node` is in the document and occupies rendered space.
pub fn has_layout<H: Host + ?Sized>(host: &H, node: H::Node) -> bool {
    host.layout(node).is_some_and(|layout| box_has_layout(&layout))
}

/// Returns `true` if the region is collapsed.
///
/// A region is collapsed when it is absent, has no layout, or is hidden
/// through `visibility` (geometry is kept in that case, so the layout check
/// alone would miss it).
pub fn is_collapsed<H: Host + ?Sized>(host: &H, node: Option<H::Node>) -> bool {
    let Some(node) = node else {
        return true;
    };
    !has_layout(host, node) || host.visibility(node) == Visibility::Hidden
}
