//! Items plugin: pickups dropped by destroyed enemies.
//!
//! Items are pooled like everything else. They fall at a fixed speed, expire
//! through the shared cull, and are collected by the resolve step on contact
//! with the player, which calls [`ItemKind::apply`].

use bevy::prelude::*;

use crate::common::category::Category;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::core::FrameSet;
use crate::plugins::player::{Player, MAX_FIRE_LEVEL};
use crate::plugins::pool::{self, EntityPool, Health, Hitbox, PoolKey, PoolState, Pooled, Velocity};

pub const ITEM_FALL_SPEED: f32 = 120.0;
/// Score awarded instead of an upgrade the player can no longer use.
pub const SURPLUS_SCORE: u64 = 250;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Coin,
    Power,
    Repair,
}

impl PoolKey for ItemKind {
    fn all() -> &'static [Self] {
        &[ItemKind::Coin, ItemKind::Power, ItemKind::Repair]
    }
}

/// What collecting an item added to the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pickup {
    pub coins: u32,
    pub score: u64,
}

impl ItemKind {
    fn color(self) -> Color {
        match self {
            ItemKind::Coin => Color::srgb(1.0, 0.84, 0.0),
            ItemKind::Power => Color::srgb(0.3, 0.6, 1.0),
            ItemKind::Repair => Color::srgb(0.3, 0.95, 0.4),
        }
    }

    /// Apply the item to the player. Maxed-out upgrades turn into score.
    pub fn apply(self, player: &mut Player, health: &mut Health) -> Pickup {
        match self {
            ItemKind::Coin => Pickup { coins: 1, score: 10 },
            ItemKind::Power if player.fire_level < MAX_FIRE_LEVEL => {
                player.fire_level += 1;
                Pickup::default()
            }
            ItemKind::Repair if health.hp < health.max => {
                health.heal(1);
                Pickup::default()
            }
            ItemKind::Power | ItemKind::Repair => Pickup { coins: 0, score: SURPLUS_SCORE },
        }
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Item {
    pub kind: ItemKind,
}

#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnItemRequest {
    pub kind: ItemKind,
    pub pos: Vec2,
}

pub type ItemPool = EntityPool<ItemKind>;

pub fn plugin(app: &mut App) {
    app.add_message::<SpawnItemRequest>();
    pool::register_pool::<ItemKind>(app);
    app.add_systems(Startup, init_item_pool);
    app.add_systems(
        Update,
        allocate_items
            .in_set(FrameSet::Spawn)
            .run_if(in_state(GameState::InGame)),
    );
}

pub fn init_item_pool(mut commands: Commands, tunables: Res<Tunables>, mut pool: ResMut<ItemPool>) {
    for &kind in ItemKind::all() {
        for _ in 0..tunables.item_pool_per_kind {
            let e = commands
                .spawn((
                    Name::new(format!("{kind:?}Item(Pooled)")),
                    Item { kind },
                    Pooled { kind },
                    PoolState::Inactive,
                    Category::Item,
                    Hitbox::square(9.0),
                    Velocity::default(),
                    Sprite {
                        color: kind.color(),
                        custom_size: Some(Vec2::splat(18.0)),
                        ..default()
                    },
                    Transform::from_xyz(0.0, 0.0, 1.5),
                    Visibility::Hidden,
                ))
                .id();
            pool.register(kind, e);
        }
    }
}

/// Spawn consumer: drop items where enemies died.
pub fn allocate_items(
    mut pool: ResMut<ItemPool>,
    mut reader: MessageReader<SpawnItemRequest>,
    mut q: Query<(&mut PoolState, &mut Transform, &mut Velocity, &mut Visibility), With<Item>>,
) {
    for req in reader.read() {
        let Some(e) = pool.acquire(req.kind) else {
            debug!("item pool exhausted for {:?}", req.kind);
            continue;
        };
        let Ok((mut state, mut tf, mut vel, mut vis)) = q.get_mut(e) else {
            error!("item pool contained {e:?} without item components");
            pool.release(e);
            continue;
        };

        *state = PoolState::Active;
        tf.translation = req.pos.extend(1.5);
        vel.0 = Vec2::new(0.0, -ITEM_FALL_SPEED);
        *vis = Visibility::Visible;
    }
}
