use embassy_time::Duration;

/// How long to wait for the final result code of an ordinary command
pub const fn command_timeout() -> Duration {
    Duration::from_secs(5)
}

/// How long to wait for the network to accept a submitted SMS (`AT+CMGS`)
pub const fn sms_submit_timeout() -> Duration {
    Duration::from_secs(15)
}

/// Pause between two signal quality polls while waiting for coverage
pub const fn coverage_poll_interval() -> Duration {
    Duration::from_secs(1)
}
