use std::time::Duration;

use pistonite_cobalt as cobalt;

use cobalt::StatusConfig;
use cobalt::co::Ownership;
use cobalt::status::BUSY_FRAMES;

#[test]
fn test_default() {
    let config = StatusConfig::default();
    assert_eq!(config.frames, BUSY_FRAMES);
    assert_eq!(config.period(), Duration::from_millis(150));
    assert_eq!(config.ownership, Ownership::Weak);
}

#[test]
fn test_ownership_from_str() {
    assert_eq!("weak".parse::<Ownership>().ok(), Some(Ownership::Weak));
    assert_eq!("Strong".parse::<Ownership>().ok(), Some(Ownership::Strong));
    assert!("shared".parse::<Ownership>().is_err());
    assert_eq!(Ownership::Strong.to_string(), "strong");
}

// env vars are process-wide, so everything touching them is in one test
#[test]
fn test_from_env() -> cobalt::Result<()> {
    let period_var = cobalt::ENV_STATUS_PERIOD_MS;
    let ownership_var = cobalt::ENV_STATUS_OWNERSHIP;
    // SAFETY: no other test in this binary reads or writes these vars
    unsafe {
        std::env::remove_var(period_var);
        std::env::remove_var(ownership_var);
    }
    assert_eq!(StatusConfig::from_env()?, StatusConfig::default());

    unsafe {
        std::env::set_var(period_var, " 80 ");
        std::env::set_var(ownership_var, "strong");
    }
    let config = StatusConfig::from_env()?;
    assert_eq!(config.period_ms, 80);
    assert_eq!(config.ownership, Ownership::Strong);

    unsafe {
        std::env::set_var(period_var, "fast");
    }
    let err = StatusConfig::from_env().unwrap_err();
    assert!(err.to_string().contains(period_var), "{err}");

    unsafe {
        std::env::set_var(period_var, "");
        std::env::set_var(ownership_var, "both");
    }
    let err = StatusConfig::from_env().unwrap_err();
    assert!(err.to_string().contains(ownership_var), "{err}");

    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt as _;
        let bad = std::ffi::OsStr::from_bytes(&[0x66, 0x6f, 0x80]);
        unsafe {
            std::env::set_var(period_var, bad);
        }
        let err = StatusConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("not valid unicode"), "{err}");
        assert!(err.to_string().contains(period_var), "{err}");
    }

    unsafe {
        std::env::remove_var(period_var);
        std::env::remove_var(ownership_var);
    }
    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn test_deserialize() -> cobalt::Result<()> {
    let config: StatusConfig = serde_json::from_str(r#"{ "period_ms": 90, "ownership": "strong" }"#)?;
    assert_eq!(config.period_ms, 90);
    assert_eq!(config.ownership, Ownership::Strong);
    assert_eq!(config.frames, BUSY_FRAMES);

    let config: StatusConfig = serde_json::from_str(r#"{ "frames": ["|", "/", "-", "\\"] }"#)?;
    assert_eq!(config.frames, vec!["|", "/", "-", "\\"]);
    assert_eq!(config.period_ms, 150);
    Ok(())
}
