fn main() {
    slider_puzzle::run();
}
