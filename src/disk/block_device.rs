use std::io::Result;

/// 按字节偏移写入的块设备抽象。
///
/// 设备容量固定：写入范围超出 `capacity()` 时必须返回
/// `ErrorKind::UnexpectedEof`，不允许悄悄扩容。
pub trait BlockDevice {
    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<()>;

    /// 设备总字节数
    fn capacity(&self) -> u64;
}

/// 检查 `[offset, offset + len)` 是否落在设备范围内
pub(crate) fn check_range(offset: u64, len: usize, capacity: u64) -> Result<()> {
    let end = offset.checked_add(len as u64);
    match end {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!(
                "write of {} bytes at offset {} exceeds device capacity of {} bytes",
                len, offset, capacity
            ),
        )),
    }
}
