// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial(env_guard)]
fn restores_previous_value_on_drop() {
    env::set_var("PK_ENV_GUARD_TEST", "before");
    {
        let _guard = EnvVarGuard::set("PK_ENV_GUARD_TEST", "during");
        assert_eq!(env::var("PK_ENV_GUARD_TEST").unwrap(), "during");
    }
    assert_eq!(env::var("PK_ENV_GUARD_TEST").unwrap(), "before");
    env::remove_var("PK_ENV_GUARD_TEST");
}

#[test]
#[serial(env_guard)]
fn removes_var_on_drop_if_previously_unset() {
    env::remove_var("PK_ENV_GUARD_TEST_UNSET");
    {
        let _guard = EnvVarGuard::set("PK_ENV_GUARD_TEST_UNSET", "during");
        assert_eq!(env::var("PK_ENV_GUARD_TEST_UNSET").unwrap(), "during");
    }
    assert!(env::var("PK_ENV_GUARD_TEST_UNSET").is_err());
}
