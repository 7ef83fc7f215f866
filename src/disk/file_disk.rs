use std::{
    fs::{File, OpenOptions},
    io::{Error, ErrorKind, Result, Seek, SeekFrom, Write},
    path::Path,
};

use crate::disk::block_device::{check_range, BlockDevice};

/// 以宿主文件作为镜像的块设备
#[derive(Debug)]
pub struct FileDisk {
    file: File,
    capacity: u64, // 打开时的文件长度
}

impl FileDisk {
    /// 打开已存在的镜像，容量即当前文件长度
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let capacity = file.metadata()?.len();

        Ok(Self { file, capacity })
    }

    /// 创建镜像或把已有镜像扩展到 `sectors * sector_size` 字节。
    /// 已有镜像比目标大时保持原长度，不截断。
    pub fn create<P: AsRef<Path>>(path: P, sectors: u64, sector_size: usize) -> Result<Self> {
        // 先算大小，溢出时不创建文件
        let wanted = sectors.checked_mul(sector_size as u64).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidInput,
                format!(
                    "{} sectors of {} bytes exceed the addressable image size",
                    sectors, sector_size
                ),
            )
        })?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        if file.metadata()?.len() < wanted {
            file.set_len(wanted)?;
        }
        let capacity = file.metadata()?.len();

        Ok(Self { file, capacity })
    }

    /// 刷回磁盘
    pub fn sync(&mut self) -> Result<()> {
        self.file.flush()?;
        self.file.sync_all()
    }
}

impl BlockDevice for FileDisk {
    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<()> {
        check_range(offset, buf.len(), self.capacity)?;
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(buf)?;
        Ok(())
    }

    fn capacity(&self) -> u64 {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_sizes_image() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("disk.img");

        let disk = FileDisk::create(&path, 8, 512).unwrap();
        assert_eq!(disk.capacity(), 4096);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 4096);
    }

    #[test]
    fn test_create_rejects_overflowing_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("disk.img");

        let err = FileDisk::create(&path, u64::MAX / 256, 512).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(!path.exists());
    }

    #[test]
    fn test_create_never_shrinks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("disk.img");
        std::fs::write(&path, vec![0xAAu8; 2048]).unwrap();

        let disk = FileDisk::create(&path, 1, 512).unwrap();
        assert_eq!(disk.capacity(), 2048);
        assert_eq!(std::fs::read(&path).unwrap(), vec![0xAAu8; 2048]);
    }

    #[test]
    fn test_open_missing_image_fails() {
        let dir = TempDir::new().unwrap();
        let err = FileDisk::open(dir.path().join("missing.img")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_write_past_end_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("disk.img");
        let mut disk = FileDisk::create(&path, 2, 512).unwrap();

        disk.write_at(1020, b"abcd").unwrap();
        let err = disk.write_at(1022, b"abcd").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);

        // 文件长度不变
        disk.sync().unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 1024);
        assert_eq!(&std::fs::read(&path).unwrap()[1020..], b"abcd");
    }
}
