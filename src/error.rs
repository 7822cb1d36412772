use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("mark id 0 is reserved for the background sentinel")]
    MarkIdZero,
    #[error("mark id {0} is already registered")]
    DuplicateMarkId(u8),
    #[error("mark {id} has {face_count} faces, exceeding the encodable capacity of {capacity}")]
    FaceCapacityExceeded {
        id: u8,
        face_count: usize,
        capacity: usize,
    },
    #[error("mark {id} has {vertex_count} vertices, which is not a multiple of 3")]
    VertexCountNotTriangles { id: u8, vertex_count: usize },
    #[error("mark {0} has no geometry")]
    EmptyGeometry(u8),
    #[error("render target size {requested} exceeds the device limit of {limit}")]
    RenderTargetSize { requested: u32, limit: u32 },
    #[error("area pick size {0} is not an odd number")]
    AreaPickSizeEven(u32),
    #[error("area pick size must be nonzero")]
    AreaPickSizeZero,
    #[error("hex color {0:?} is not in #RRGGBB form")]
    InvalidHexColor(String),
    #[error("{0}")]
    BufferDownloadOneShotReceive(#[from] oneshot::RecvError),
    #[error("{0}")]
    BufferDownloadAsync(#[from] wgpu::BufferAsyncError),
}
