/// 扇区大小：512 字节
/// 引导盘按扇区寻址，所有布局都以扇区为单位计算。
pub const SECTOR_SIZE: usize = 512;
