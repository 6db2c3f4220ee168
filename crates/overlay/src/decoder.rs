use crate::*;
use base::{Tensor, Vec2};

/// Per-pixel class indices with declared shape `[height, width]`.
///
/// Indexing convention: the class of the pixel at row `r`, column `c` is
/// `data[r * width + c]`. Some model exports report extra trailing unit
/// dimensions (`[height, width, 1]`); those are accepted. Verify this
/// layout against the output of the model in use, a transposed export
/// would otherwise decode without error into a mirrored, rotated mask.
pub type ClassIndexTensor = Tensor<i32>;

fn declared_dims(shape: &[usize]) -> Result<(usize, usize), DecodeError> {
    match shape {
        [height, width, rest @ ..]
            if *height > 0 && *width > 0 && rest.iter().all(|&dim| dim == 1) =>
        {
            Ok((*height, *width))
        }
        _ => Err(DecodeError::Dimensions(shape.to_vec())),
    }
}

/// Color-map `tensor` into a packed RGB bitmap of the same height and width.
///
/// Visits every cell exactly once in row-major order and writes its color
/// at the matching packed-pixel offset. A zero-sized or malformed tensor is
/// an error, never an empty bitmap.
pub fn decode(tensor: &ClassIndexTensor, lut: &ColorLut) -> Result<MaskBitmap, DecodeError> {
    let (height, width) = declared_dims(&tensor.shape)?;
    let cells = height
        .checked_mul(width)
        .filter(|cells| cells.checked_mul(BYTES_PER_PIXEL).is_some())
        .ok_or_else(|| DecodeError::Dimensions(tensor.shape.clone()))?;
    if tensor.data.len() != cells {
        return Err(DecodeError::Length {
            expected: cells,
            got: tensor.data.len(),
        });
    }

    let mut data = Vec::with_capacity(cells * BYTES_PER_PIXEL);
    for row in tensor.data.chunks_exact(width) {
        for &class in row {
            data.extend_from_slice(&lut.color_for(class).to_array());
        }
    }

    MaskBitmap::new(Vec2::new(width, height), data).map_err(|err| DecodeError::Length {
        expected: cells * BYTES_PER_PIXEL,
        got: err.len,
    })
}
