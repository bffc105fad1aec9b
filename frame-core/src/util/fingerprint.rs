//! 64 位指纹
//!
//! 确定性的非加密哈希，用于廉价地给名字和帧内容建键：
//! - `fingerprint`: 任意字节序列 → u64，永不返回 0 或 1
//! - `fingerprint_cat`: 按顺序组合两个指纹，无需拼接字节缓冲区
//!
//! 0 和 1 是保留的哨兵值（调用方用它们表示“空”和“已删除”）。

/// 初始种子（大素数）
const SEED: u64 = 0xa5b8_5c5e_198e_d849;

/// 组合用的两个大素数
const MUL1: u64 = 0xc6a4_a793_5bd1_e995;
const MUL2: u64 = 0x0228_876a_7198_b743;

/// 保留值命中时的固定替代值
const REMAP_ZERO: u64 = 0x9e37_79b9_7f4a_7c15;
const REMAP_ONE: u64 = 0x9e37_79b9_7f4a_7c16;

/// 顺序相关地组合两个指纹
///
/// `fingerprint_cat(a, b)` 一般不等于 `fingerprint_cat(b, a)`。
#[inline]
pub fn fingerprint_cat(fp1: u64, fp2: u64) -> u64 {
    let a = fp1.wrapping_mul(MUL1).wrapping_add(fp2.wrapping_mul(MUL2));
    // 高 17 位全为 1 时加 0，否则加上非零的高位补码，结果不会落在 {0, 1}
    a.wrapping_add(!a >> 47)
}

/// 计算字节序列的指纹（空序列同样有定义）
pub fn fingerprint(bytes: &[u8]) -> u64 {
    let mut fp = SEED;

    let mut words = bytes.chunks_exact(8);
    for chunk in &mut words {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        fp = fingerprint_cat(fp, u64::from_le_bytes(word));
    }

    // 不足 8 字节的尾部按字节累积为一个字；前导的 1 区分尾部长度（"" 与 "\0"）
    let residual = words
        .remainder()
        .iter()
        .fold(1u64, |acc, &b| (acc << 8) | u64::from(b));

    exclude_reserved(fingerprint_cat(fp, residual))
}

/// 字符串的指纹（按 UTF-8 字节）
#[inline]
pub fn fingerprint_str(text: &str) -> u64 {
    fingerprint(text.as_bytes())
}

/// 把保留值映射到固定的替代值
#[inline]
fn exclude_reserved(fp: u64) -> u64 {
    match fp {
        0 => REMAP_ZERO,
        1 => REMAP_ONE,
        other => other,
    }
}
