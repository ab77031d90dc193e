pub fn run(host: &str, port: u16) {
    let base = format!("http://{host}:{port}");

    println!("🌱 Verdant Sensor Simulator v{}", verdant_core::VERSION);
    println!("   {base}");
    println!();
    println!("   Endpoints:");
    println!("     GET /            API index (try: curl {base})");
    println!("     GET /sensor      One synthetic reading");
    println!("     GET /advice      Current reading + rule evaluation");
    println!("     GET /health      Liveness check");
    println!();
    println!("   Query params for /sensor:");
    println!("     jitter=false     Deterministic waveform, for smoke tests");
    println!();
    println!("   Point a dashboard at it:");
    println!("     verdant watch --endpoint {base}/sensor");
    println!();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(verdant_server::run_server(host, port));
}
