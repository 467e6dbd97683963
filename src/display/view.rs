// Frame buffer view - read-only access to a session's pixels
//
// A view borrows the session's buffer, so it cannot outlive the session and
// cannot be held across the next `advance` call (which needs `&mut Session`).

use super::presenter::PresentError;
use crate::machine::{FrameGeometry, Session};

/// Read-only RGBA8 view of exactly one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameBufferView<'a> {
    bytes: &'a [u8],
    geometry: FrameGeometry,
}

impl<'a> FrameBufferView<'a> {
    /// Wrap a byte slice, checking it holds exactly `width * height * 4` bytes
    ///
    /// # Errors
    /// [`PresentError::SizeMismatch`] if the length is wrong
    pub fn new(bytes: &'a [u8], geometry: FrameGeometry) -> Result<Self, PresentError> {
        if bytes.len() != geometry.byte_len() {
            return Err(PresentError::SizeMismatch {
                expected: geometry.byte_len(),
                actual: bytes.len(),
            });
        }
        Ok(Self { bytes, geometry })
    }

    /// View the current frame of a session
    pub fn of_session(session: &'a dyn Session, geometry: FrameGeometry) -> Result<Self, PresentError> {
        Self::new(session.frame_buffer(), geometry)
    }

    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &'a [u8]> + 'a {
        self.bytes.chunks_exact(self.geometry.row_len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_accepts_exact_length() {
        let geometry = FrameGeometry::new(2, 3);
        let bytes = vec![0u8; 24];
        let view = FrameBufferView::new(&bytes, geometry).unwrap();
        assert_eq!(view.as_bytes().len(), 24);
        assert_eq!(view.rows().count(), 3);
    }

    #[test]
    fn test_view_rejects_wrong_length() {
        let geometry = FrameGeometry::new(2, 3);
        let bytes = vec![0u8; 23];
        let err = FrameBufferView::new(&bytes, geometry).unwrap_err();
        assert!(matches!(
            err,
            PresentError::SizeMismatch {
                expected: 24,
                actual: 23
            }
        ));
    }

    #[test]
    fn test_rows_are_top_first() {
        let geometry = FrameGeometry::new(1, 2);
        let bytes = [1, 1, 1, 1, 2, 2, 2, 2];
        let view = FrameBufferView::new(&bytes, geometry).unwrap();
        let rows: Vec<&[u8]> = view.rows().collect();
        assert_eq!(rows[0], &[1, 1, 1, 1]);
        assert_eq!(rows[1], &[2, 2, 2, 2]);
    }
}
