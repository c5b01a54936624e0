//! 日志初始化测试
//!
//! 全局 subscriber 只能安装一次，测试之间串行执行。

use serial_test::serial;

#[test]
#[serial]
fn test_init_logger_is_idempotent() {
    dobot_sdk::init_logger();
    dobot_sdk::init_logger();

    tracing::info!("tracing record after init");
    log::info!("log record bridged into tracing");

    assert!(dobot_sdk::try_init_logger().is_err());
}

#[test]
#[serial]
fn test_second_install_reports_error() {
    dobot_sdk::init_logger();
    let result = dobot_sdk::try_init_logger_with("dobot_driver=trace");
    assert!(matches!(
        result,
        Err(dobot_sdk::LoggerError::Subscriber(_)) | Err(dobot_sdk::LoggerError::LogBridge(_))
    ));
}
