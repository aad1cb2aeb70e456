use crate::error::{AppError, AppResult};

/// Reduce an ascending sequence to at most `max_points` plot points by
/// uniform stride sampling, always keeping the first and last element.
///
/// Not statistical downsampling: no averaging within a stride. Uniform
/// selection keeps per-point cost constant and point spacing predictable
/// on the time axis. The output is a subsequence of the input, at most
/// `max_points + 1` long (the final point is force-appended when the
/// stride misses it), and the function is idempotent.
///
/// # Errors
///
/// Returns `AppError::InvalidInput` if `max_points` is zero.
pub fn downsample<T: Clone>(points: &[T], max_points: usize) -> AppResult<Vec<T>> {
    if max_points == 0 {
        return Err(AppError::InvalidInput(
            "max_points must be positive".to_string(),
        ));
    }

    if points.len() <= max_points {
        return Ok(points.to_vec());
    }

    let stride = points.len().div_ceil(max_points);
    let mut out: Vec<T> = points.iter().step_by(stride).cloned().collect();

    // step_by ends at the largest multiple of stride below len
    let last_emitted = ((points.len() - 1) / stride) * stride;
    if last_emitted != points.len() - 1 {
        out.push(points[points.len() - 1].clone());
    }

    Ok(out)
}
