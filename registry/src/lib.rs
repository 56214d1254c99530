use std::sync::Arc;

use adapter::calendar::{CalendarClient, CalendarDispatcher};
use adapter::database::ConnectionPool;
use adapter::redis::RedisClient;
use adapter::repository::auth::AuthRepositoryImpl;
use adapter::repository::equipment::EquipmentRepositoryImpl;
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::maintenance::MaintenanceRepositoryImpl;
use adapter::repository::reservation::ReservationRepositoryImpl;
use adapter::repository::review::ReviewRepositoryImpl;
use adapter::repository::room::RoomRepositoryImpl;
use adapter::repository::user::UserRepositoryImpl;
use kernel::clock::{Clock, SystemClock};
use kernel::repository::auth::AuthRepository;
use kernel::repository::equipment::EquipmentRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::maintenance::MaintenanceRepository;
use kernel::repository::reservation::ReservationRepository;
use kernel::repository::review::ReviewRepository;
use kernel::repository::room::RoomRepository;
use kernel::repository::user::UserRepository;
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
    room_repository: Arc<dyn RoomRepository>,
    equipment_repository: Arc<dyn EquipmentRepository>,
    maintenance_repository: Arc<dyn MaintenanceRepository>,
    review_repository: Arc<dyn ReviewRepository>,
    user_repository: Arc<dyn UserRepository>,
    auth_repository: Arc<dyn AuthRepository>,
    calendar_dispatcher: CalendarDispatcher,
}

impl AppRegistry {
    pub fn new(
        pool: ConnectionPool,
        redis_client: Arc<RedisClient>,
        app_config: AppConfig,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let reservation_repository =
            Arc::new(ReservationRepositoryImpl::new(pool.clone(), clock.clone()));
        let room_repository = Arc::new(RoomRepositoryImpl::new(pool.clone()));
        let equipment_repository = Arc::new(EquipmentRepositoryImpl::new(pool.clone()));
        let maintenance_repository = Arc::new(MaintenanceRepositoryImpl::new(pool.clone()));
        let review_repository = Arc::new(ReviewRepositoryImpl::new(pool.clone(), clock.clone()));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(
            pool.clone(),
            redis_client.clone(),
            app_config.auth.ttl,
        ));

        // カレンダー反映はバックグラウンドのワーカーに任せる
        let calendar_dispatcher =
            CalendarDispatcher::spawn(CalendarClient::new(&app_config.calendar));

        Self {
            health_check_repository,
            reservation_repository,
            room_repository,
            equipment_repository,
            maintenance_repository,
            review_repository,
            user_repository,
            auth_repository,
            calendar_dispatcher,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }

    pub fn room_repository(&self) -> Arc<dyn RoomRepository> {
        self.room_repository.clone()
    }

    pub fn equipment_repository(&self) -> Arc<dyn EquipmentRepository> {
        self.equipment_repository.clone()
    }

    pub fn maintenance_repository(&self) -> Arc<dyn MaintenanceRepository> {
        self.maintenance_repository.clone()
    }

    pub fn review_repository(&self) -> Arc<dyn ReviewRepository> {
        self.review_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }

    pub fn calendar_dispatcher(&self) -> &CalendarDispatcher {
        &self.calendar_dispatcher
    }
}
