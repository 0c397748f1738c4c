fn main() {
    // Use the vendored protoc binary so no system installation is required.
    let protoc = protoc_bin_vendored::protoc_bin_path().expect("vendored protoc not found");
    let well_known = protoc_bin_vendored::include_path().expect("vendored protoc include path not found");
    std::env::set_var("PROTOC", protoc);

    let out_dir = std::path::PathBuf::from(std::env::var("OUT_DIR").unwrap());
    tonic_build::configure()
        .file_descriptor_set_path(out_dir.join("flagbase_descriptor.bin"))
        .compile_protos(&["proto/flagbase.proto"], &[std::path::PathBuf::from("proto"), well_known])
        .expect("failed to compile proto/flagbase.proto");
}
