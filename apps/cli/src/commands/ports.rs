//! 串口枚举命令

use anyhow::Result;

/// 列出系统中可见的串口
pub fn list() -> Result<()> {
    let ports = dobot_sdk::available_ports();

    if ports.is_empty() {
        println!("⚠️  未发现可用串口");
        return Ok(());
    }

    println!("📋 可用串口:");
    for port in &ports {
        println!("  {:<20} {}", port.name, port.description);
    }

    Ok(())
}
