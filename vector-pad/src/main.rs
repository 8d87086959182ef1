fn main() -> eframe::Result {
    vector_pad::run_native()
}
