//! Root integration-test entry point. Each module exercises one slice of
//! the system end to end: the `patchext` handler binary driven through
//! `assert_cmd`, or the engine crate wired together exactly as the core
//! process wires it, with a `FakePackageManager` standing in for a real
//! package-manager family.

mod support;

mod cli {
    mod help;
}

mod handler {
    mod enable;
    mod install_uninstall_reset;
    mod update;
}

mod engine {
    mod assessment;
    mod installation;
    mod truncation;
}
