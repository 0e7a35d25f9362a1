#[derive(Clone)]
pub struct InputImage {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl InputImage {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        InputImage {
            file_name: file_name.into(),
            data,
        }
    }
}
