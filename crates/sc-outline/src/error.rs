use core::fmt;

/// Pipeline checkpoint after which a cancellation was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Grid,
    VerticalEdges,
    Stitching,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid => f.write_str("grid build"),
            Self::VerticalEdges => f.write_str("vertical edge extraction"),
            Self::Stitching => f.write_str("loop stitching"),
        }
    }
}

/// Internal consistency faults of the loop stitcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StitchError {
    /// A new loop had to be seeded but no vertical edge was left.
    EmptyVerticalPool { horizontal_left: usize },
    /// Vertical edges that no loop could absorb.
    UnconsumedEdges { vertical: usize },
}

impl fmt::Display for StitchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyVerticalPool { horizontal_left } => write!(
                f,
                "no vertical edge left to seed a loop ({horizontal_left} horizontal edges remain)"
            ),
            Self::UnconsumedEdges { vertical } => {
                write!(f, "{vertical} vertical edges could not be attached to any loop")
            }
        }
    }
}

impl std::error::Error for StitchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineError {
    Cancelled { after: PipelineStage },
    InvalidCellSize,
    Stitch(StitchError),
}

impl OutlineError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

impl fmt::Display for OutlineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled { after } => write!(f, "outline computation cancelled after {after}"),
            Self::InvalidCellSize => f.write_str("cell size must be positive"),
            Self::Stitch(e) => write!(f, "stitching failed: {e}"),
        }
    }
}

impl std::error::Error for OutlineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Stitch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StitchError> for OutlineError {
    fn from(e: StitchError) -> Self {
        Self::Stitch(e)
    }
}
