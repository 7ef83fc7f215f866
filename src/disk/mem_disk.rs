use std::io::Result;

use crate::disk::block_device::{check_range, BlockDevice};

/// 内存中的定长块设备
#[derive(Debug, Clone)]
pub struct MemDisk {
    bytes: Vec<u8>,
}

impl MemDisk {
    pub fn new(sectors: u64, sector_size: usize) -> Self {
        Self {
            bytes: vec![0u8; sectors as usize * sector_size],
        }
    }

    /// 读取 `[offset, offset + len)`，越界返回 None
    pub fn read_at(&self, offset: u64, len: usize) -> Option<&[u8]> {
        let start = usize::try_from(offset).ok()?;
        let end = start.checked_add(len)?;
        self.bytes.get(start..end)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl BlockDevice for MemDisk {
    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<()> {
        check_range(offset, buf.len(), self.capacity())?;
        let start = offset as usize;
        self.bytes[start..start + buf.len()].copy_from_slice(buf);
        Ok(())
    }

    fn capacity(&self) -> u64 {
        self.bytes.len() as u64
    }
}
