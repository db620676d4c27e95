fn main() {
    println!("cargo:rerun-if-env-changed=RAIDTREE_VERSION");
}
