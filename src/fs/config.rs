use serde::{Deserialize, Serialize};

use crate::{
    disk::SECTOR_SIZE,
    fs::{
        directory::{ENTRY_SIZE, NAME_LEN},
        error::{FsError, Result},
    },
};

/// 目录所在扇区
pub const DIR_SECTOR: u32 = 100;

/// 数据区起始扇区
pub const DATA_START_SECTOR: u32 = 110;

/// 一个扇区可容纳的目录项数：512 / 32
pub const MAX_ENTRIES: usize = SECTOR_SIZE / ENTRY_SIZE;

/// 镜像布局参数。构建期间不可变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub sector_size: usize,     // 每扇区字节数
    pub dir_sector: u32,        // 目录扇区号
    pub data_start_sector: u32, // 数据区起始扇区号
    pub max_entries: usize,     // 目录项上限
    pub max_name_bytes: usize,  // 文件名最大字节数
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sector_size: SECTOR_SIZE,
            dir_sector: DIR_SECTOR,
            data_start_sector: DATA_START_SECTOR,
            max_entries: MAX_ENTRIES,
            max_name_bytes: NAME_LEN,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sector_size == 0 {
            return Err(FsError::InvalidConfig("sector size is zero".to_string()));
        }
        if self.max_name_bytes == 0 || self.max_name_bytes > NAME_LEN {
            return Err(FsError::InvalidConfig(format!(
                "name limit {} must be within 1..={}",
                self.max_name_bytes, NAME_LEN
            )));
        }
        if self.max_entries == 0 {
            return Err(FsError::InvalidConfig(
                "directory must hold at least one entry".to_string(),
            ));
        }
        // 目录只占一个扇区
        let table_bytes = self.max_entries.checked_mul(ENTRY_SIZE);
        if table_bytes.map_or(true, |n| n > self.sector_size) {
            return Err(FsError::InvalidConfig(format!(
                "{} entries of {} bytes do not fit in a {}-byte sector",
                self.max_entries, ENTRY_SIZE, self.sector_size
            )));
        }
        if self.data_start_sector <= self.dir_sector {
            return Err(FsError::InvalidConfig(format!(
                "data region (sector {}) must start after the directory (sector {})",
                self.data_start_sector, self.dir_sector
            )));
        }
        Ok(())
    }

    /// 扇区号对应的字节偏移
    pub fn sector_offset(&self, sector: u32) -> u64 {
        sector as u64 * self.sector_size as u64
    }

    pub fn dir_offset(&self) -> u64 {
        self.sector_offset(self.dir_sector)
    }

    /// ceil(len / sector_size)
    pub fn sectors_for(&self, len: usize) -> u64 {
        (len as u64).div_ceil(self.sector_size as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = LayoutConfig::default();
        config.validate().unwrap();

        assert_eq!(config.max_entries, 16);
        assert_eq!(config.max_name_bytes, 20);
        assert_eq!(config.dir_offset(), 51200);
        assert_eq!(config.sector_offset(110), 56320);
    }

    #[test]
    fn test_sectors_for_rounds_up() {
        let config = LayoutConfig::default();
        assert_eq!(config.sectors_for(0), 0);
        assert_eq!(config.sectors_for(1), 1);
        assert_eq!(config.sectors_for(512), 1);
        assert_eq!(config.sectors_for(513), 2);
        assert_eq!(config.sectors_for(1024), 2);
    }

    #[test]
    fn test_rejects_broken_layouts() {
        let base = LayoutConfig::default();

        let cases = [
            LayoutConfig {
                sector_size: 0,
                ..base
            },
            LayoutConfig {
                max_name_bytes: 0,
                ..base
            },
            LayoutConfig {
                max_name_bytes: 21,
                ..base
            },
            LayoutConfig {
                max_entries: 0,
                ..base
            },
            LayoutConfig {
                max_entries: 17,
                ..base
            },
            LayoutConfig {
                data_start_sector: 100,
                ..base
            },
            LayoutConfig {
                sector_size: 256,
                ..base
            },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(FsError::InvalidConfig(_))),
                "{:?} should be rejected",
                config
            );
        }
    }

    #[test]
    fn test_alternate_sector_size() {
        let config = LayoutConfig {
            sector_size: 4096,
            max_entries: 128,
            ..LayoutConfig::default()
        };
        config.validate().unwrap();
        assert_eq!(config.sectors_for(4097), 2);
        assert_eq!(config.dir_offset(), 100 * 4096);
    }
}
