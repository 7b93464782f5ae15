fn main() {
    formation_shooter::game::run();
}
