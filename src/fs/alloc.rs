use crate::fs::{
    config::LayoutConfig,
    error::{FsError, Result},
};

/// 数据区扇区分配器：游标只前进不回收
#[derive(Debug, Clone, Copy)]
pub struct SectorAllocator {
    cursor: u32, // 下一个空闲扇区
    config: LayoutConfig,
}

impl SectorAllocator {
    /// 游标从数据区起始扇区开始
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            cursor: config.data_start_sector,
            config,
        }
    }

    /// 为 `len` 字节分配连续扇区，返回首扇区号。
    /// 长度为 0 时不占扇区，与下一个文件共用起点。
    pub fn allocate(&mut self, len: usize) -> Result<u32> {
        let start = self.cursor;
        let sectors = self.config.sectors_for(len);

        self.cursor = u32::try_from(start as u64 + sectors).map_err(|_| {
            FsError::ImageTooLarge(format!(
                "{} bytes starting at sector {} run past sector {}",
                len,
                start,
                u32::MAX
            ))
        })?;
        Ok(start)
    }

    pub fn next_free(&self) -> u32 {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_allocation() {
        let mut alloc = SectorAllocator::new(LayoutConfig::default());
        assert_eq!(alloc.allocate(10).unwrap(), 110);
        assert_eq!(alloc.allocate(513).unwrap(), 111);
        assert_eq!(alloc.allocate(1024).unwrap(), 113);
        assert_eq!(alloc.next_free(), 115);
    }

    #[test]
    fn test_empty_file_takes_no_sector() {
        let mut alloc = SectorAllocator::new(LayoutConfig::default());
        assert_eq!(alloc.allocate(0).unwrap(), 110);
        assert_eq!(alloc.allocate(1).unwrap(), 110);
        assert_eq!(alloc.next_free(), 111);
    }

    #[test]
    fn test_cursor_overflow() {
        let mut alloc = SectorAllocator::new(LayoutConfig {
            dir_sector: 100,
            data_start_sector: u32::MAX - 1,
            ..LayoutConfig::default()
        });
        assert_eq!(alloc.allocate(512).unwrap(), u32::MAX - 1);
        assert!(matches!(alloc.allocate(1024), Err(FsError::ImageTooLarge(_))));
        // 失败不移动游标
        assert_eq!(alloc.next_free(), u32::MAX);
    }
}
