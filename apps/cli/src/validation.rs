//! 输入验证模块
//!
//! 在下发指令前拒绝非有限值和明显越界的参数。

use anyhow::Result;

/// 坐标验证器
pub struct CoordinateValidator {
    /// 单轴坐标绝对值上限（mm）
    max_abs: f32,
}

impl CoordinateValidator {
    /// 创建新的坐标验证器
    ///
    /// # 参数
    /// * `max_abs` - 单轴坐标绝对值上限（mm），默认 1000
    pub fn new(max_abs: Option<f32>) -> Self {
        Self {
            max_abs: max_abs.unwrap_or(1000.0),
        }
    }

    pub fn default_range() -> Self {
        Self::new(None)
    }

    /// 验证单个坐标
    pub fn validate_axis(&self, axis: &str, value: f32) -> Result<()> {
        if !value.is_finite() {
            anyhow::bail!(
                "{} 坐标无效: {}",
                axis,
                if value.is_nan() { "NaN" } else { "无穷大" }
            );
        }
        if value.abs() > self.max_abs {
            anyhow::bail!(
                "{} 坐标 {:.2} 超出范围 [{:.2}, {:.2}]",
                axis,
                value,
                -self.max_abs,
                self.max_abs
            );
        }
        Ok(())
    }

    /// 验证位姿 (x, y, z, r)
    pub fn validate_pose(&self, x: f32, y: f32, z: f32, r: f32) -> Result<()> {
        for (axis, value) in [("X", x), ("Y", y), ("Z", z), ("R", r)] {
            self.validate_axis(axis, value)?;
        }
        Ok(())
    }
}

/// 验证速度/加速度/高度类参数（有限且非负）
pub fn validate_non_negative(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        anyhow::bail!("{} 必须是非负有限数，得到: {}", name, value);
    }
    Ok(())
}
