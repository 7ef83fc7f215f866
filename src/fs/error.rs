use std::fmt;

/// 文件系统镜像构建错误
#[derive(Debug)]
pub enum FsError {
    Io(std::io::Error), // 底层 I/O 错误
    /// 写入某个文件（或目录扇区）时设备出错
    Device {
        name: String,
        source: std::io::Error,
    },
    InvalidName {
        name: String,
        reason: NameError,
    }, // 文件名不合法，带原因
    DuplicateName(String), // 同名文件
    DirectoryFull {
        count: usize,
        capacity: usize,
    }, // 文件数超过目录容量
    ImageTooLarge(String), // 扇区号或文件大小超出 u32
    InvalidConfig(String), // 布局参数不合法
    Encoding(bincode::Error), // 目录项编解码失败
}

/// 文件名被拒绝的具体原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
    Empty,
    TooLong { len: usize, max: usize },
    NonAscii,
    ContainsNul,
}

impl From<std::io::Error> for FsError {
    fn from(e: std::io::Error) -> Self {
        FsError::Io(e)
    }
}

impl From<bincode::Error> for FsError {
    fn from(e: bincode::Error) -> Self {
        FsError::Encoding(e)
    }
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "name is empty"),
            Self::TooLong { len, max } => {
                write!(f, "name is {} bytes, at most {} allowed", len, max)
            }
            Self::NonAscii => write!(f, "name contains non-ASCII characters"),
            Self::ContainsNul => write!(f, "name contains a NUL byte"),
        }
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // 底层错误经 source() 链出，这里不重复打印
            Self::Io(_) => write!(f, "Disk I/O error"),
            Self::Device { name, .. } => write!(f, "Failed to write '{}' to the image", name),
            Self::InvalidName { name, reason } => {
                write!(f, "Invalid file name '{}': {}", name.escape_default(), reason)
            }
            Self::DuplicateName(name) => write!(f, "Duplicate file name: {}", name),
            Self::DirectoryFull { count, capacity } => write!(
                f,
                "Directory is full: {} files given, only {} entries fit",
                count, capacity
            ),
            Self::ImageTooLarge(desc) => write!(f, "Image too large: {}", desc),
            Self::InvalidConfig(desc) => write!(f, "Invalid layout: {}", desc),
            Self::Encoding(_) => write!(f, "Directory entry encoding error"),
        }
    }
}

// 支持链式错误，方便追踪底层原因
impl std::error::Error for FsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Device { source, .. } => Some(source),
            Self::Encoding(e) => Some(e),
            _ => None,
        }
    }
}

/// 文件系统统一结果类型
pub type Result<T> = std::result::Result<T, FsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_device_error_chains_cause_once() {
        let err = FsError::Device {
            name: "hello.txt".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "disk too small"),
        };

        assert_eq!(err.to_string(), "Failed to write 'hello.txt' to the image");
        let source = err.source().map(|e| e.to_string());
        assert_eq!(source.as_deref(), Some("disk too small"));
    }

    #[test]
    fn test_name_error_message() {
        let err = FsError::InvalidName {
            name: "abcdefghijklmnopqrstu".to_string(),
            reason: NameError::TooLong { len: 21, max: 20 },
        };
        assert_eq!(
            err.to_string(),
            "Invalid file name 'abcdefghijklmnopqrstu': name is 21 bytes, at most 20 allowed"
        );
    }
}
