pub mod hit;

pub use hit::Entity as HitEntity;
