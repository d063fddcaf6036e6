fn main() {
    // Diagnostics go to a file only when asked for; stdout belongs to UCI.
    #[cfg(feature = "cli")]
    if std::env::var_os("TEMPO_LOG").is_some() {
        tempo::logger::init_logging("logs/tempo.log", "tempo=debug");
    }

    tempo::uci::run();
}
