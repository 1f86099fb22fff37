//! Declared, order-preserving encoding between structured parameters and a
//! single flat vector.
//!
//! Structured parameters are represented as one `Vec<f32>` per group, in the
//! shape's declared group order.

use crate::error::{CodecErr, Result};
use crate::shape::ModelShape;

/// Concatenates structured parameters into a single flat vector.
///
/// # Arguments
/// * `groups` - One value block per shape group, in declared order.
/// * `shape` - The shape the parameters must conform to.
///
/// # Errors
/// Returns `GroupCountMismatch` or `GroupLenMismatch` if the blocks do not
/// match the shape.
pub fn flatten(groups: &[Vec<f32>], shape: &ModelShape) -> Result<Vec<f32>> {
    if groups.len() != shape.groups.len() {
        return Err(CodecErr::GroupCountMismatch {
            got: groups.len(),
            expected: shape.groups.len(),
        });
    }

    let mut flat = Vec::with_capacity(shape.total_len());
    for (block, group) in groups.iter().zip(&shape.groups) {
        if block.len() != group.len {
            return Err(CodecErr::GroupLenMismatch {
                group: group.name.clone(),
                got: block.len(),
                expected: group.len,
            });
        }
        flat.extend_from_slice(block);
    }

    Ok(flat)
}

/// Splits a flat vector back into per-group value blocks.
///
/// Inverse of [`flatten`] for any parameters consistent with `shape`.
///
/// # Errors
/// Returns `ShapeMismatch` if `flat.len() != shape.total_len()`.
pub fn reconstruct(flat: &[f32], shape: &ModelShape) -> Result<Vec<Vec<f32>>> {
    if flat.len() != shape.total_len() {
        return Err(CodecErr::ShapeMismatch {
            got: flat.len(),
            expected: shape.total_len(),
        });
    }

    let mut blocks = Vec::with_capacity(shape.groups.len());
    let mut offset = 0;
    for group in &shape.groups {
        blocks.push(flat[offset..offset + group.len].to_vec());
        offset += group.len;
    }

    Ok(blocks)
}
