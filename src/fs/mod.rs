//! 扁平文件系统镜像构建。
//!
//! 布局：目录占一个扇区（默认第 100 扇区），每项 32 字节；
//! 文件数据从数据区起始扇区（默认第 110 扇区）开始按输入顺序连续存放，
//! 每个文件从扇区边界开始。镜像一次写成，之后只读。

use crate::{
    disk::BlockDevice,
    fs::{
        alloc::SectorAllocator,
        config::LayoutConfig,
        directory::{DirectoryEntry, DirectoryTable},
        error::{FsError, Result},
    },
};

pub mod alloc;
pub mod config;
pub mod directory;
pub mod error;

/// 一个待写入的文件：名字和原始字节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    pub name: String,
    pub content: Vec<u8>,
}

impl FileSpec {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// 一次构建的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub entries: Vec<DirectoryEntry>, // 已写入的目录项，顺序同输入
    pub next_free_sector: u32,        // 数据区之后的第一个空闲扇区
}

impl BuildReport {
    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone)]
pub struct ImageBuilder {
    config: LayoutConfig,
}

impl ImageBuilder {
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// 只做分配和校验，不访问设备
    pub fn plan(&self, files: &[FileSpec]) -> Result<Vec<DirectoryEntry>> {
        Ok(self.layout(files)?.0.into_entries())
    }

    /// 写入所有文件和目录，返回写入的目录项数
    pub fn build<D: BlockDevice + ?Sized>(
        &self,
        device: &mut D,
        files: &[FileSpec],
    ) -> Result<usize> {
        Ok(self.build_report(device, files)?.count())
    }

    pub fn build_report<D: BlockDevice + ?Sized>(
        &self,
        device: &mut D,
        files: &[FileSpec],
    ) -> Result<BuildReport> {
        let (table, next_free_sector) = self.layout(files)?;
        self.check_fits(device.capacity(), next_free_sector)?;

        // 先写数据，最后写目录：数据写失败时目录保持原样
        for (file, entry) in files.iter().zip(table.entries()) {
            if !file.content.is_empty() {
                device
                    .write_at(self.config.sector_offset(entry.start), &file.content)
                    .map_err(|source| FsError::Device {
                        name: file.name.clone(),
                        source,
                    })?;
            }
            tracing::debug!(
                name = %file.name,
                start = entry.start,
                size = entry.size,
                "placed file"
            );
        }

        let sector = table.to_sector(self.config.sector_size)?;
        device
            .write_at(self.config.dir_offset(), &sector)
            .map_err(|source| FsError::Device {
                name: "<directory>".to_string(),
                source,
            })?;

        tracing::info!(
            count = table.len(),
            dir_sector = self.config.dir_sector,
            next_free_sector,
            "image built"
        );

        Ok(BuildReport {
            entries: table.into_entries(),
            next_free_sector,
        })
    }

    // 分配扇区并生成目录表，同时返回数据区之后的空闲扇区
    fn layout(&self, files: &[FileSpec]) -> Result<(DirectoryTable, u32)> {
        if files.len() > self.config.max_entries {
            return Err(FsError::DirectoryFull {
                count: files.len(),
                capacity: self.config.max_entries,
            });
        }

        let mut alloc = SectorAllocator::new(self.config);
        let mut table = DirectoryTable::new(self.config.max_entries);

        for file in files {
            let size = u32::try_from(file.content.len()).map_err(|_| {
                FsError::ImageTooLarge(format!(
                    "'{}' is {} bytes, sizes are stored as u32",
                    file.name,
                    file.content.len()
                ))
            })?;
            let entry = DirectoryEntry::new(&file.name, 0, size, self.config.max_name_bytes)?;
            let start = alloc.allocate(file.content.len())?;
            table.push(DirectoryEntry { start, ..entry })?;
        }

        Ok((table, alloc.next_free()))
    }

    // 设备必须容纳目录扇区和整个数据区
    fn check_fits(&self, capacity: u64, next_free_sector: u32) -> Result<()> {
        let dir_end = self.config.sector_offset(self.config.dir_sector + 1);
        let data_end = self.config.sector_offset(next_free_sector);
        let needed = dir_end.max(data_end);

        if needed > capacity {
            return Err(FsError::Device {
                name: "<image>".to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!(
                        "image needs {} bytes but the device holds {} bytes",
                        needed, capacity
                    ),
                ),
            });
        }
        Ok(())
    }
}
