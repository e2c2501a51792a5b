//! Retrieves information about the version of the crate from Git and the build
//! environment. It can be accessed at runtime through the `build` module
//! produced by [`shadow_rs`].

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
