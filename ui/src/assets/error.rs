/// Errors that can occur while fetching or decoding the model.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to fetch '{url}': {source}")]
    Fetch {
        url: String,
        #[source]
        source: gloo_net::Error,
    },

    #[error("'{url}' answered with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("invalid glTF: {0}")]
    Parse(#[from] gltf::Error),

    #[error("buffer {0} has no data")]
    MissingBuffer(usize),

    #[error("buffer {index} holds {actual} bytes, expected at least {expected}")]
    ShortBuffer {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("failed to decode image {0}: {1}")]
    Image(usize, #[source] image::ImageError),

    #[error("glTF document has no scene")]
    NoScene,

    #[error("model contains no triangles")]
    Empty,
}
