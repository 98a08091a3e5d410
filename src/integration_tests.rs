#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    use crate::actor_framework::FrameworkError;
    use crate::app_system::{BookingSystem, Config};
    use crate::booking_actor::{BookingAction, BookingError};
    use crate::clients::{
        BookingClient, CouponClient, HotelClient, LedgerClient, NotificationClient, PaymentSubmission, RoomClient,
        UserClient,
    };
    use crate::coupon_actor::{CouponAction, CouponActionResult};
    use crate::domain::{
        Booking, BookingRequest, BookingStatus, Caller, Coupon, CouponCreate, Discount, Hotel, HotelCreate, HotelStatus,
        Payment, PaymentMethod, PaymentState, Price, Role, RoomCategory, RoomCategoryCreate, User, UserCreate,
    };
    use crate::hotel_actor::HotelError;
    use crate::mock_framework::{create_mock_client, expect_action, expect_get, expect_list, record};
    use crate::notification_actor::TracingDispatcher;
    use crate::payment_actor::PaymentError;
    use crate::review_actor::ReviewError;
    use crate::room_actor::{RoomAction, RoomActionResult};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn stay_request(hotel_id: &str, room_id: &str, coupon: Option<&str>) -> BookingRequest {
        BookingRequest {
            hotel_id: hotel_id.to_string(),
            room_category_id: room_id.to_string(),
            check_in: date(10),
            check_out: date(12),
            guests: 2,
            rooms: 1,
            coupon_code: coupon.map(str::to_string),
        }
    }

    fn save10() -> CouponCreate {
        CouponCreate {
            code: "save10".into(),
            discount: Discount::Percentage(10),
            max_discount: None,
            min_subtotal: dec!(0),
            valid_from: date(1),
            valid_until: date(28),
            usage_limit: 5,
        }
    }

    #[tokio::test]
    async fn test_failed_reservation_returns_coupon_use() {
        // 1. Setup Mocks
        let (user_inner, mut user_rx) = create_mock_client::<User>(10);
        let (hotel_inner, mut hotel_rx) = create_mock_client::<Hotel>(10);
        let (room_inner, mut room_rx) = create_mock_client::<RoomCategory>(10);
        let (coupon_inner, mut coupon_rx) = create_mock_client::<Coupon>(10);
        let (booking_inner, mut booking_rx) = create_mock_client(10);
        let (ledger_inner, _ledger_rx) = create_mock_client(10);
        let (payment_inner, _payment_rx) = create_mock_client(10);
        let (notification_inner, _notification_rx) = create_mock_client(10);

        let hotels = HotelClient::new(hotel_inner, RoomClient::new(room_inner));
        let bookings = BookingClient::new(
            booking_inner,
            UserClient::new(user_inner),
            hotels,
            CouponClient::new(coupon_inner),
            LedgerClient::new(ledger_inner),
            payment_inner,
            NotificationClient::new(notification_inner, Arc::new(TracingDispatcher)),
            30,
        );

        // 2. Execute booking creation in background
        let task = tokio::spawn(async move {
            let caller = Caller::new("user_1", Role::Customer);
            bookings
                .create_booking(&caller, stay_request("hotel_1", "room_1", Some("save10")), date(1))
                .await
        });

        // 3. Answer each step
        let (user_id, responder) = expect_get(&mut user_rx).await.expect("Expected User Get");
        assert_eq!(user_id, "user_1");
        let user = record::<User>(
            user_id,
            UserCreate {
                name: "Karim".into(),
                email: "karim@example.com".into(),
                phone: None,
                role: Role::Customer,
            },
        );
        responder.send(Ok(Some(user))).unwrap();

        let (hotel_id, responder) = expect_get(&mut hotel_rx).await.expect("Expected Hotel Get");
        let mut hotel = record::<Hotel>(
            hotel_id,
            HotelCreate {
                owner_id: "user_9".into(),
                name: "Sea Pearl".into(),
                city: "Cox's Bazar".into(),
                address: "Kolatoli Road".into(),
                description: String::new(),
                amenities: vec![],
            },
        );
        hotel.status = HotelStatus::Approved;
        responder.send(Ok(Some(hotel))).unwrap();

        let (room_id, responder) = expect_get(&mut room_rx).await.expect("Expected Room Get");
        let room = record::<RoomCategory>(
            room_id,
            RoomCategoryCreate {
                hotel_id: "hotel_1".into(),
                name: "Deluxe".into(),
                total_rooms: 1,
                prices: vec![Price {
                    max_guests: 2,
                    nightly_rate: dec!(5000),
                }],
            },
        );
        responder.send(Ok(Some(room))).unwrap();

        let (filter, responder) = expect_list(&mut coupon_rx).await.expect("Expected Coupon List");
        let coupon = record::<Coupon>("coupon_1".into(), save10());
        assert!(filter(&coupon));
        responder.send(Ok(vec![coupon])).unwrap();

        let (coupon_id, action, responder) = expect_action(&mut coupon_rx).await.expect("Expected Redeem");
        assert_eq!(coupon_id, "coupon_1");
        match action {
            CouponAction::Redeem { subtotal, .. } => assert_eq!(subtotal, dec!(10000)),
            other => panic!("Unexpected action: {:?}", other),
        }
        responder.send(Ok(CouponActionResult::Discount(dec!(1000)))).unwrap();

        let (_, action, responder) = expect_action(&mut room_rx).await.expect("Expected Reserve");
        assert!(matches!(action, RoomAction::Reserve { rooms: 1, .. }));
        responder
            .send(Err(FrameworkError::Rejected(
                "Not enough rooms available. 1 taken, 1 requested, 1 total.".into(),
            )))
            .unwrap();

        let (coupon_id, action, responder) = expect_action(&mut coupon_rx).await.expect("Expected Unredeem");
        assert_eq!(coupon_id, "coupon_1");
        assert!(matches!(action, CouponAction::Unredeem));
        responder.send(Ok(CouponActionResult::UsageReleased { used_count: 0 })).unwrap();

        // 4. Verify result: no booking record was attempted
        let result = task.await.unwrap();
        assert!(matches!(result, Err(BookingError::Unavailable(_))), "got {result:?}");
        assert!(booking_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failed_booking_record_releases_rooms() {
        let (user_inner, mut user_rx) = create_mock_client::<User>(10);
        let (hotel_inner, mut hotel_rx) = create_mock_client::<Hotel>(10);
        let (room_inner, mut room_rx) = create_mock_client::<RoomCategory>(10);
        let (coupon_inner, _coupon_rx) = create_mock_client::<Coupon>(10);
        let (booking_inner, mut booking_rx) = create_mock_client(10);
        let (ledger_inner, _ledger_rx) = create_mock_client(10);
        let (payment_inner, _payment_rx) = create_mock_client(10);
        let (notification_inner, _notification_rx) = create_mock_client(10);

        let bookings = BookingClient::new(
            booking_inner,
            UserClient::new(user_inner),
            HotelClient::new(hotel_inner, RoomClient::new(room_inner)),
            CouponClient::new(coupon_inner),
            LedgerClient::new(ledger_inner),
            payment_inner,
            NotificationClient::new(notification_inner, Arc::new(TracingDispatcher)),
            30,
        );
        let task = tokio::spawn(async move {
            let caller = Caller::new("user_1", Role::Customer);
            bookings.create_booking(&caller, stay_request("hotel_1", "room_1", None), date(1)).await
        });

        let (id, responder) = expect_get(&mut user_rx).await.unwrap();
        let user = record::<User>(
            id,
            UserCreate {
                name: "Karim".into(),
                email: "karim@example.com".into(),
                phone: None,
                role: Role::Customer,
            },
        );
        responder.send(Ok(Some(user))).unwrap();

        let (id, responder) = expect_get(&mut hotel_rx).await.unwrap();
        let mut hotel = record::<Hotel>(
            id,
            HotelCreate {
                owner_id: "user_9".into(),
                name: "Sea Pearl".into(),
                city: "Cox's Bazar".into(),
                address: "Kolatoli Road".into(),
                description: String::new(),
                amenities: vec![],
            },
        );
        hotel.status = HotelStatus::Approved;
        responder.send(Ok(Some(hotel))).unwrap();

        let (id, responder) = expect_get(&mut room_rx).await.unwrap();
        let room = record::<RoomCategory>(
            id,
            RoomCategoryCreate {
                hotel_id: "hotel_1".into(),
                name: "Deluxe".into(),
                total_rooms: 3,
                prices: vec![Price {
                    max_guests: 2,
                    nightly_rate: dec!(5000),
                }],
            },
        );
        responder.send(Ok(Some(room))).unwrap();

        let (_, _, responder) = expect_action(&mut room_rx).await.expect("Expected Reserve");
        responder.send(Ok(RoomActionResult::Reserved { reservation_id: 7 })).unwrap();

        match booking_rx.recv().await {
            Some(crate::actor_framework::ResourceRequest::Create { respond_to, .. }) => {
                respond_to.send(Err(FrameworkError::ActorDropped)).unwrap();
            }
            _ => panic!("Expected Booking Create"),
        }

        let (_, action, responder) = expect_action(&mut room_rx).await.expect("Expected Release");
        assert!(matches!(action, RoomAction::Release { reservation_id: 7 }));
        responder.send(Ok(RoomActionResult::Released { rooms: 1 })).unwrap();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(BookingError::ActorCommunicationError(_))), "got {result:?}");
    }

    // --- Full system ---

    struct World {
        system: BookingSystem,
        admin: Caller,
        owner: Caller,
        hotel_id: String,
        room_id: String,
    }

    async fn register(system: &BookingSystem, name: &str, role: Role) -> Caller {
        let user = system
            .users
            .register(UserCreate {
                name: name.into(),
                email: format!("{}@example.com", name.to_lowercase()),
                phone: None,
                role,
            })
            .await
            .unwrap();
        Caller::new(user.id, user.role)
    }

    async fn world(total_rooms: u32) -> World {
        let config = Config::default();
        let system = BookingSystem::new(&config);
        let admin = system.seed_admin(&config).await.unwrap();
        let admin = Caller::new(admin.id, Role::Admin);
        let owner = register(&system, "Owner", Role::HotelOwner).await;

        let hotel = system
            .hotels
            .create_hotel(
                &owner,
                HotelCreate {
                    owner_id: String::new(),
                    name: "Sea Pearl".into(),
                    city: "Cox's Bazar".into(),
                    address: "Kolatoli Road".into(),
                    description: "Beachfront".into(),
                    amenities: vec!["wifi".into()],
                },
            )
            .await
            .unwrap();
        system
            .hotels
            .set_status(&admin, hotel.id.clone(), HotelStatus::Approved)
            .await
            .unwrap();
        let room = system
            .hotels
            .add_room(
                &owner,
                hotel.id.clone(),
                "Deluxe".into(),
                total_rooms,
                vec![
                    Price {
                        max_guests: 2,
                        nightly_rate: dec!(5000),
                    },
                    Price {
                        max_guests: 3,
                        nightly_rate: dec!(6500),
                    },
                ],
            )
            .await
            .unwrap();

        World {
            system,
            admin,
            owner,
            hotel_id: hotel.id,
            room_id: room.id,
        }
    }

    #[tokio::test]
    async fn test_last_room_goes_to_exactly_one_guest() {
        let w = world(1).await;
        let karim = register(&w.system, "Karim", Role::Customer).await;
        let rahima = register(&w.system, "Rahima", Role::Customer).await;
        let request = stay_request(&w.hotel_id, &w.room_id, None);

        let (first, second) = tokio::join!(
            w.system.bookings.create_booking(&karim, request.clone(), date(1)),
            w.system.bookings.create_booking(&rahima, request.clone(), date(1)),
        );
        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(BookingError::Unavailable(msg)) if msg.contains("1 taken, 1 requested, 1 total"))));

        // a stay that only touches the check-out day still fits
        let mut later = request;
        later.check_in = date(12);
        later.check_out = date(13);
        w.system.bookings.create_booking(&karim, later, date(1)).await.unwrap();
        w.system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_booking_frees_the_room() {
        let w = world(1).await;
        let karim = register(&w.system, "Karim", Role::Customer).await;
        let rahima = register(&w.system, "Rahima", Role::Customer).await;
        let request = stay_request(&w.hotel_id, &w.room_id, None);

        let booking = w.system.bookings.create_booking(&karim, request.clone(), date(1)).await.unwrap();
        assert!(w.system.bookings.create_booking(&rahima, request.clone(), date(1)).await.is_err());

        // too late for the guest on the check-in day, the hotel can still cancel
        let late = w.system.bookings.cancel_booking(&karim, booking.id.clone(), date(10)).await;
        assert!(matches!(late, Err(BookingError::InvalidState(_))), "got {late:?}");
        let cancelled = w
            .system
            .bookings
            .cancel_booking(&w.owner, booking.id.clone(), date(10))
            .await
            .unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        w.system.bookings.create_booking(&rahima, request, date(1)).await.unwrap();
        w.system.shutdown().await.unwrap();
    }

    async fn pay_by_transfer(system: &BookingSystem, guest: &Caller, booking: &Booking) -> Payment {
        system
            .payments
            .submit_payment(
                guest,
                PaymentSubmission {
                    booking_id: booking.id.clone(),
                    method: PaymentMethod::BankTransfer,
                    reference: "DBBL-778812".into(),
                    payer_account: None,
                    amount: booking.total,
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_completed_stay_returns_rooms() {
        let w = world(1).await;
        let karim = register(&w.system, "Karim", Role::Customer).await;
        let booking = w
            .system
            .bookings
            .create_booking(&karim, stay_request(&w.hotel_id, &w.room_id, None), date(1))
            .await
            .unwrap();
        let payment = pay_by_transfer(&w.system, &karim, &booking).await;
        w.system.payments.verify_payment(&w.admin, payment.id).await.unwrap();

        let early = w.system.bookings.complete_booking(&w.owner, booking.id.clone(), date(11)).await;
        assert!(matches!(early, Err(BookingError::InvalidState(_))), "got {early:?}");
        let completed = w
            .system
            .bookings
            .complete_booking(&w.owner, booking.id.clone(), date(12))
            .await
            .unwrap();
        assert_eq!(completed.status, BookingStatus::Completed);

        let room = w.system.hotels.rooms().require_room(w.room_id.clone()).await.unwrap();
        assert_eq!(room.available_rooms, room.total_rooms);
        assert!(room.reservations.is_empty());

        w.system.hotels.delete_room(&w.owner, w.room_id.clone()).await.unwrap();
        w.system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_rejects_payment_under_review() {
        let w = world(1).await;
        let karim = register(&w.system, "Karim", Role::Customer).await;
        let booking = w
            .system
            .bookings
            .create_booking(&karim, stay_request(&w.hotel_id, &w.room_id, None), date(1))
            .await
            .unwrap();
        let payment = pay_by_transfer(&w.system, &karim, &booking).await;
        assert_eq!(w.system.payments.pending_payments(&w.admin).await.unwrap().len(), 1);

        w.system.bookings.cancel_booking(&karim, booking.id.clone(), date(1)).await.unwrap();

        assert!(w.system.payments.pending_payments(&w.admin).await.unwrap().is_empty());
        let payments = w.system.payments.payments_for_booking(&karim, booking.id.clone()).await.unwrap();
        assert_eq!(payments[0].status, PaymentState::Rejected);
        assert_eq!(payments[0].note.as_deref(), Some("booking cancelled"));
        assert!(w.system.payments.verify_payment(&w.admin, payment.id).await.is_err());

        let stats = w.system.dashboard.stats(&w.admin).await.unwrap();
        assert_eq!(stats.pending_payments, 0);
        assert_eq!(stats.revenue, dec!(0));
        w.system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_verify_rejects_payment_for_unconfirmable_booking() {
        let w = world(1).await;
        let karim = register(&w.system, "Karim", Role::Customer).await;
        let booking = w
            .system
            .bookings
            .create_booking(&karim, stay_request(&w.hotel_id, &w.room_id, None), date(1))
            .await
            .unwrap();
        let payment = pay_by_transfer(&w.system, &karim, &booking).await;

        // booking cancelled behind the payment's back
        w.system
            .bookings
            .apply(booking.id.clone(), BookingAction::Cancel { cutoff: None })
            .await
            .unwrap();

        let result = w.system.payments.verify_payment(&w.admin, payment.id.clone()).await;
        assert!(matches!(result, Err(PaymentError::InvalidState(_))), "got {result:?}");
        assert!(w.system.payments.pending_payments(&w.admin).await.unwrap().is_empty());
        let payments = w.system.payments.payments_for_booking(&karim, booking.id).await.unwrap();
        assert_eq!(payments[0].status, PaymentState::Rejected);
        w.system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_verified_payment_confirms_and_invoices() {
        let w = world(2).await;
        let karim = register(&w.system, "Karim", Role::Customer).await;
        let booking = w
            .system
            .bookings
            .create_booking(&karim, stay_request(&w.hotel_id, &w.room_id, None), date(1))
            .await
            .unwrap();
        assert_eq!(booking.total, dec!(10000));

        let wrong_amount = w
            .system
            .payments
            .submit_payment(
                &karim,
                PaymentSubmission {
                    booking_id: booking.id.clone(),
                    method: PaymentMethod::Bkash,
                    reference: "TRX12345AB".into(),
                    payer_account: Some("01712345678".into()),
                    amount: dec!(9000),
                },
            )
            .await;
        assert!(wrong_amount.is_err());

        let payment = w
            .system
            .payments
            .submit_payment(
                &karim,
                PaymentSubmission {
                    booking_id: booking.id.clone(),
                    method: PaymentMethod::Bkash,
                    reference: "TRX12345AB".into(),
                    payer_account: Some("01712345678".into()),
                    amount: dec!(10000),
                },
            )
            .await
            .unwrap();

        // customers cannot verify their own payment
        assert!(w.system.payments.verify_payment(&karim, payment.id.clone()).await.is_err());
        w.system.payments.verify_payment(&w.admin, payment.id.clone()).await.unwrap();
        assert!(w.system.payments.verify_payment(&w.admin, payment.id).await.is_err());

        let confirmed = w.system.bookings.get_booking_for(&karim, booking.id.clone()).await.unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);

        let invoice = w.system.payments.invoice_for_booking(&karim, booking.id.clone()).await.unwrap();
        assert_eq!(invoice.total, dec!(10000));
        assert!(invoice.render().contains(&invoice.number));

        let stats = w.system.dashboard.stats(&w.admin).await.unwrap();
        assert_eq!(stats.revenue, dec!(10000));
        assert_eq!(stats.bookings_by_status["confirmed"], 1);
        w.system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_only_guests_with_a_stay_can_review() {
        let w = world(2).await;
        let karim = register(&w.system, "Karim", Role::Customer).await;
        let comment = "Lovely sea view and friendly staff.".to_string();

        let early = w
            .system
            .reviews
            .create_review(&karim, w.hotel_id.clone(), 5, comment.clone())
            .await;
        assert!(matches!(early, Err(ReviewError::NotEligible(_))), "got {early:?}");

        let booking = w
            .system
            .bookings
            .create_booking(&karim, stay_request(&w.hotel_id, &w.room_id, None), date(1))
            .await
            .unwrap();
        let payment = w
            .system
            .payments
            .submit_payment(
                &karim,
                PaymentSubmission {
                    booking_id: booking.id,
                    method: PaymentMethod::BankTransfer,
                    reference: "DBBL-778812".into(),
                    payer_account: None,
                    amount: dec!(10000),
                },
            )
            .await
            .unwrap();
        w.system.payments.verify_payment(&w.admin, payment.id).await.unwrap();

        let review = w
            .system
            .reviews
            .create_review(&karim, w.hotel_id.clone(), 5, comment.clone())
            .await
            .unwrap();
        assert!(w
            .system
            .reviews
            .create_review(&karim, w.hotel_id.clone(), 4, comment)
            .await
            .is_err());

        // hidden until moderated
        assert_eq!(w.system.reviews.rating(w.hotel_id.clone()).await.unwrap().count, 0);
        w.system
            .reviews
            .moderate(&w.admin, review.id, crate::domain::ReviewStatus::Approved)
            .await
            .unwrap();
        let rating = w.system.reviews.rating(w.hotel_id.clone()).await.unwrap();
        assert_eq!(rating.count, 1);
        assert_eq!(rating.average, Some(5.0));
        w.system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_coupon_unused_when_rooms_run_out() {
        let w = world(1).await;
        let karim = register(&w.system, "Karim", Role::Customer).await;
        let rahima = register(&w.system, "Rahima", Role::Customer).await;
        w.system.coupons.create_coupon(&w.admin, save10()).await.unwrap();

        w.system
            .bookings
            .create_booking(&karim, stay_request(&w.hotel_id, &w.room_id, None), date(1))
            .await
            .unwrap();
        let result = w
            .system
            .bookings
            .create_booking(&rahima, stay_request(&w.hotel_id, &w.room_id, Some("SAVE10")), date(1))
            .await;
        assert!(matches!(result, Err(BookingError::Unavailable(_))), "got {result:?}");

        let coupons = w.system.coupons.list_coupons(&w.admin).await.unwrap();
        assert_eq!(coupons[0].used_count, 0);
        w.system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_roles_guard_hotel_management() {
        let w = world(2).await;
        let karim = register(&w.system, "Karim", Role::Customer).await;
        let rival = register(&w.system, "Rival", Role::HotelOwner).await;

        let listing = HotelCreate {
            owner_id: String::new(),
            name: "Hill View".into(),
            city: "Sylhet".into(),
            address: "Airport Road".into(),
            description: String::new(),
            amenities: vec![],
        };
        let denied = w.system.hotels.create_hotel(&karim, listing).await;
        assert!(matches!(denied, Err(HotelError::Forbidden(_))));

        let approve = w
            .system
            .hotels
            .set_status(&w.owner, w.hotel_id.clone(), HotelStatus::Suspended)
            .await;
        assert!(matches!(approve, Err(HotelError::Forbidden(_))));

        let foreign_room = w
            .system
            .hotels
            .add_room(
                &rival,
                w.hotel_id.clone(),
                "Suite".into(),
                1,
                vec![Price {
                    max_guests: 2,
                    nightly_rate: dec!(9000),
                }],
            )
            .await;
        assert!(matches!(foreign_room, Err(HotelError::Forbidden(_))));

        // suspended hotels disappear from search and stop taking bookings
        w.system
            .hotels
            .set_status(&w.admin, w.hotel_id.clone(), HotelStatus::Suspended)
            .await
            .unwrap();
        assert!(w.system.hotels.search(Default::default()).await.unwrap().is_empty());
        let booking = w
            .system
            .bookings
            .create_booking(&karim, stay_request(&w.hotel_id, &w.room_id, None), date(1))
            .await;
        assert!(matches!(booking, Err(BookingError::InvalidHotel(_))));
        w.system.shutdown().await.unwrap();
    }
}
