fn main() {
    runscan::app::startup::startup();
}
