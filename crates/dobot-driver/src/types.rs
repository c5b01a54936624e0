//! 指令参数类型

use dobot_protocol::{PayloadReader, PayloadWriter, ProtocolError};

/// 笛卡尔位姿（x/y/z 单位 mm，r 为末端旋转角，单位度）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32, z: f32, r: f32) -> Self {
        Self { x, y, z, r }
    }

    pub(crate) fn write(&self, w: &mut PayloadWriter) {
        w.put_f32(self.x).put_f32(self.y).put_f32(self.z).put_f32(self.r);
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(x={:.2}, y={:.2}, z={:.2}, r={:.2})",
            self.x, self.y, self.z, self.r
        )
    }
}

/// PTP 坐标轴速度与加速度
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementProfile {
    pub xyz_velocity: f32,
    pub r_velocity: f32,
    pub xyz_acceleration: f32,
    pub r_acceleration: f32,
}

impl MovementProfile {
    /// 负载长度（4 × f32）
    pub const ENCODED_LEN: usize = 16;

    pub const fn new(xyz_velocity: f32, r_velocity: f32, xyz_acceleration: f32, r_acceleration: f32) -> Self {
        Self {
            xyz_velocity,
            r_velocity,
            xyz_acceleration,
            r_acceleration,
        }
    }

    pub(crate) fn write(&self, w: &mut PayloadWriter) {
        w.put_f32(self.xyz_velocity)
            .put_f32(self.r_velocity)
            .put_f32(self.xyz_acceleration)
            .put_f32(self.r_acceleration);
    }

    /// 解析查询应答
    pub fn decode(payload: &[u8]) -> Result<Self, ProtocolError> {
        let mut r = PayloadReader::new(payload);
        let profile = Self {
            xyz_velocity: r.f32()?,
            r_velocity: r.f32()?,
            xyz_acceleration: r.f32()?,
            r_acceleration: r.f32()?,
        };
        r.finish()?;
        Ok(profile)
    }
}

/// 门型运动（Jump）抬升高度，单位 mm
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LiftHeight {
    pub jump_height: f32,
    pub max_height: f32,
}

impl LiftHeight {
    pub const fn new(jump_height: f32, max_height: f32) -> Self {
        Self {
            jump_height,
            max_height,
        }
    }

    pub(crate) fn write(&self, w: &mut PayloadWriter) {
        w.put_f32(self.jump_height).put_f32(self.max_height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_profile_decode() {
        let mut w = PayloadWriter::new();
        MovementProfile::new(100.0, 50.0, 80.0, 40.0).write(&mut w);
        let bytes = w.finish();
        assert_eq!(bytes.len(), MovementProfile::ENCODED_LEN);
        assert_eq!(
            MovementProfile::decode(&bytes).unwrap(),
            MovementProfile::new(100.0, 50.0, 80.0, 40.0)
        );
    }

    #[test]
    fn test_movement_profile_decode_rejects_wrong_length() {
        assert!(matches!(
            MovementProfile::decode(&[0u8; 12]),
            Err(ProtocolError::PayloadTooShort { .. })
        ));
        assert!(matches!(
            MovementProfile::decode(&[0u8; 17]),
            Err(ProtocolError::TrailingBytes { count: 1 })
        ));
    }

    #[test]
    fn test_position_display() {
        assert_eq!(
            Position::new(200.0, 0.0, 50.5, -10.0).to_string(),
            "(x=200.00, y=0.00, z=50.50, r=-10.00)"
        );
    }
}
