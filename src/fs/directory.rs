use serde::{Deserialize, Serialize};

use crate::fs::error::{FsError, NameError, Result};

/// 目录项名字段长度
pub const NAME_LEN: usize = 20;

/// 目录项在磁盘上的大小：name[20] + start + size + flags
pub const ENTRY_SIZE: usize = 32;

/// 磁盘上的一个目录项（32 字节，小端）
///
/// bincode 默认配置为定长小端整数，定长数组不带长度前缀，
/// 序列化结果与 `name[20] start:u32 size:u32 flags:u32` 逐字节一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: [u8; NAME_LEN], // 以 NUL 填充，恰好 20 字节时不带结尾 NUL
    pub start: u32,           // 文件数据的首扇区
    pub size: u32,            // 文件字节数（不按扇区取整）
    pub flags: u32,           // 保留，恒为 0
}

impl DirectoryEntry {
    pub fn new(name: &str, start: u32, size: u32, max_name_bytes: usize) -> Result<Self> {
        validate_name(name, max_name_bytes).map_err(|reason| FsError::InvalidName {
            name: name.to_string(),
            reason,
        })?;

        let mut raw = [0u8; NAME_LEN];
        raw[..name.len()].copy_from_slice(name.as_bytes());

        Ok(Self {
            name: raw,
            start,
            size,
            flags: 0,
        })
    }

    /// 名字中第一个 NUL 之前的部分
    pub fn name_str(&self) -> &str {
        let len = self.name.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        std::str::from_utf8(&self.name[..len]).unwrap_or("")
    }

    /// 空槽位：名字首字节为 NUL
    pub fn is_empty_slot(&self) -> bool {
        self.name[0] == 0
    }

    pub fn to_bytes(&self) -> Result<[u8; ENTRY_SIZE]> {
        let encoded = bincode::serialize(self)?;
        let mut out = [0u8; ENTRY_SIZE];
        out.copy_from_slice(&encoded);
        Ok(out)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let slot = bytes.get(..ENTRY_SIZE).ok_or_else(|| {
            FsError::Encoding(Box::new(bincode::ErrorKind::Custom(format!(
                "directory entry needs {} bytes, got {}",
                ENTRY_SIZE,
                bytes.len()
            ))))
        })?;
        Ok(bincode::deserialize(slot)?)
    }
}

/// 校验文件名：非空、纯 ASCII、不含 NUL、不超过上限
pub fn validate_name(name: &str, max_name_bytes: usize) -> std::result::Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if !name.is_ascii() {
        return Err(NameError::NonAscii);
    }
    if name.bytes().any(|b| b == 0) {
        return Err(NameError::ContainsNul);
    }
    let max = max_name_bytes.min(NAME_LEN);
    if name.len() > max {
        return Err(NameError::TooLong {
            len: name.len(),
            max,
        });
    }
    Ok(())
}

/// 目录表：一个扇区内按顺序排列的定长目录项
#[derive(Debug, Clone)]
pub struct DirectoryTable {
    entries: Vec<DirectoryEntry>,
    capacity: usize,
}

impl DirectoryTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    // 追加目录项，满了或重名则报错
    pub fn push(&mut self, entry: DirectoryEntry) -> Result<()> {
        if self.entries.len() >= self.capacity {
            return Err(FsError::DirectoryFull {
                count: self.entries.len() + 1,
                capacity: self.capacity,
            });
        }
        if self.entries.iter().any(|e| e.name == entry.name) {
            return Err(FsError::DuplicateName(entry.name_str().to_string()));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<DirectoryEntry> {
        self.entries
    }

    /// 序列化整个目录扇区，未用槽位清零
    pub fn to_sector(&self, sector_size: usize) -> Result<Vec<u8>> {
        if self.entries.len() * ENTRY_SIZE > sector_size {
            return Err(FsError::DirectoryFull {
                count: self.entries.len(),
                capacity: sector_size / ENTRY_SIZE,
            });
        }

        let mut sector = vec![0u8; sector_size];
        for (i, entry) in self.entries.iter().enumerate() {
            let offset = i * ENTRY_SIZE;
            sector[offset..offset + ENTRY_SIZE].copy_from_slice(&entry.to_bytes()?);
        }
        Ok(sector)
    }

    /// 从目录扇区解析，遇到首个空槽位即停止
    pub fn from_sector(sector: &[u8], capacity: usize) -> Result<Self> {
        let mut table = Self::new(capacity);
        for slot in sector.chunks_exact(ENTRY_SIZE).take(capacity) {
            let entry = DirectoryEntry::from_bytes(slot)?;
            if entry.is_empty_slot() {
                break;
            }
            table.entries.push(entry);
        }
        Ok(table)
    }
}
