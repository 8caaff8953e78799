fn main() {
    // Embed the application manifest when building with the MSVC Windows toolchain.
    // This enables PerMonitorV2 DPI awareness as declared in hostframe.manifest, which the
    // host relies on when it scales the initial window size for the target monitor.
    #[cfg(all(target_os = "windows", target_env = "msvc"))]
    {
        println!("cargo:rerun-if-changed=hostframe.manifest");
        println!("cargo:rustc-link-arg-bins=/MANIFEST:EMBED");
        println!("cargo:rustc-link-arg-bins=/MANIFESTINPUT:hostframe.manifest");
        println!("cargo:rustc-link-arg-bins=/MANIFESTUAC:level='asInvoker' uiAccess='false'");
    }
    // If someone builds with MinGW (gnu), we just warn (no embedding here).
    #[cfg(all(target_os = "windows", not(target_env = "msvc")))]
    {
        println!(
            "cargo:warning=Manifest embedding not configured for non-MSVC toolchain; hostframe.manifest may be ignored."
        );
    }
}
