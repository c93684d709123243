fn main() {
    // Forwards the ESP-IDF link arguments; prints nothing on a host build
    embuild::espidf::sysenv::output();

    println!("cargo:rerun-if-env-changed=WIFI_SSID");
    println!("cargo:rerun-if-env-changed=WIFI_PASS");
}
