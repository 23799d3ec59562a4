fn main() {
    poddavki::run_cli();
}
