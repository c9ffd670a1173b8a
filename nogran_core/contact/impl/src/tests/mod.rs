use nogran_persistence_contracts::{contact::MockContactRepository, MockDatabase, MockTransaction};
use nogran_shared_contracts::time::MockTimeService;

use crate::ContactFeatureServiceImpl;

mod get;
mod update;

type Sut = ContactFeatureServiceImpl<
    MockDatabase,
    MockTimeService,
    MockContactRepository<MockTransaction>,
>;
